//! Maintenance endpoints.
//!
//! ```text
//! POST /api/v1/admin/sync
//! GET  /api/v1/admin/verify
//! GET  /api/v1/admin/ping
//! ```
//!
//! These are unauthenticated; deploy them behind a trusted network.

use actix_web::{get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::{PingReport, SyncReport, VerifyReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Outcome of a sync run.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    /// Unique catalogue identities considered.
    pub catalogue_count: usize,
    /// Rows inserted by this run.
    pub upserted: usize,
    /// Rows in the store afterwards.
    pub total: u64,
}

impl From<SyncReport> for SyncResponse {
    fn from(value: SyncReport) -> Self {
        Self {
            catalogue_count: value.catalogue_count,
            upserted: value.upserted,
            total: value.total,
        }
    }
}

/// Catalogue and store consistency report.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Unique catalogue identities.
    pub catalogue_count: usize,
    /// Rows in the store.
    pub store_count: u64,
    /// Catalogue identities with no row.
    pub missing_count: usize,
    /// Encoded keys of the missing identities.
    pub missing: Vec<String>,
    /// Rows whose identity is not in the catalogue.
    pub orphan_count: usize,
    /// Expected columns absent from the `collection` table.
    pub missing_columns: Vec<String>,
    /// Whether the table schema could be inspected.
    pub schema_checked: bool,
}

impl From<VerifyReport> for VerifyResponse {
    fn from(value: VerifyReport) -> Self {
        Self {
            catalogue_count: value.catalogue_count,
            store_count: value.store_count,
            missing_count: value.missing_count,
            missing: value.missing,
            orphan_count: value.orphan_count,
            missing_columns: value.missing_columns,
            schema_checked: value.schema_checked,
        }
    }
}

/// Store connectivity.
#[derive(Debug, Serialize, ToSchema)]
pub struct PingResponse {
    /// The store answered.
    pub ok: bool,
    /// Rows in the store.
    pub rows: u64,
}

impl From<PingReport> for PingResponse {
    fn from(value: PingReport) -> Self {
        Self {
            ok: value.ok,
            rows: value.rows,
        }
    }
}

/// Insert default rows for catalogue printings missing from the store.
#[utoipa::path(
    post,
    path = "/api/v1/admin/sync",
    responses(
        (status = 200, description = "Sync report", body = SyncResponse),
        (status = 503, description = "Catalogue or store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "syncCollection"
)]
#[post("/admin/sync")]
pub async fn sync(state: web::Data<HttpState>) -> ApiResult<web::Json<SyncResponse>> {
    let report = state.admin.sync().await?;
    Ok(web::Json(SyncResponse::from(report)))
}

/// Compare catalogue, store, and table schema without writing.
#[utoipa::path(
    get,
    path = "/api/v1/admin/verify",
    responses(
        (status = 200, description = "Verify report", body = VerifyResponse),
        (status = 503, description = "Catalogue or store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "verifyCollection"
)]
#[get("/admin/verify")]
pub async fn verify(state: web::Data<HttpState>) -> ApiResult<web::Json<VerifyResponse>> {
    let report = state.admin.verify().await?;
    Ok(web::Json(VerifyResponse::from(report)))
}

/// Check that the store is reachable.
#[utoipa::path(
    get,
    path = "/api/v1/admin/ping",
    responses(
        (status = 200, description = "Store reachable", body = PingResponse),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "pingCollection"
)]
#[get("/admin/ping")]
pub async fn ping(state: web::Data<HttpState>) -> ApiResult<web::Json<PingResponse>> {
    let report = state.admin.ping().await?;
    Ok(web::Json(PingResponse::from(report)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::Error;
    use crate::domain::ports::MockCollectionAdmin;
    use crate::inbound::http::state::HttpStatePorts;

    async fn call(admin: MockCollectionAdmin, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let ports = HttpStatePorts {
            admin: Arc::new(admin),
            ..HttpStatePorts::default()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(ports)))
                .service(
                    web::scope("/api/v1")
                        .service(sync)
                        .service(verify)
                        .service(ping),
                ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        (status, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn sync_reports_counts() {
        let mut admin = MockCollectionAdmin::new();
        admin.expect_sync().times(1).return_once(|| {
            Ok(SyncReport {
                catalogue_count: 3,
                upserted: 2,
                total: 3,
            })
        });

        let (status, body) =
            call(admin, actix_test::TestRequest::post().uri("/api/v1/admin/sync")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["catalogueCount"], 3);
        assert_eq!(body["upserted"], 2);
        assert_eq!(body["total"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn sync_is_post_only() {
        let mut admin = MockCollectionAdmin::new();
        admin.expect_sync().never();
        let ports = HttpStatePorts {
            admin: Arc::new(admin),
            ..HttpStatePorts::default()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(ports)))
                .service(web::scope("/api/v1").service(sync)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/admin/sync")
                .to_request(),
        )
        .await;

        assert!(response.status().is_client_error());
    }

    #[rstest]
    #[actix_web::test]
    async fn verify_reports_missing_keys() {
        let mut admin = MockCollectionAdmin::new();
        admin.expect_verify().return_once(|| {
            Ok(VerifyReport {
                catalogue_count: 2,
                store_count: 1,
                missing_count: 1,
                missing: vec!["Vi|||V-1".to_owned()],
                orphan_count: 0,
                missing_columns: Vec::new(),
                schema_checked: true,
            })
        });

        let (status, body) =
            call(admin, actix_test::TestRequest::get().uri("/api/v1/admin/verify")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing"][0], "Vi|||V-1");
        assert_eq!(body["missingCount"], 1);
        assert_eq!(body["schemaChecked"], true);
    }

    #[rstest]
    #[actix_web::test]
    async fn ping_surfaces_unavailable_store() {
        let mut admin = MockCollectionAdmin::new();
        admin
            .expect_ping()
            .return_once(|| Err(Error::service_unavailable("collection store unavailable")));

        let (status, body) =
            call(admin, actix_test::TestRequest::get().uri("/api/v1/admin/ping")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "service_unavailable");
    }
}
