//! Collection status endpoints.
//!
//! ```text
//! GET   /api/v1/collection
//! PATCH /api/v1/collection
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpsertStatusRequest;
use crate::domain::{CollectionStatus, StatusMap, StatusPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_card_key};

const NAME_FIELD: FieldName = FieldName::new("name");

/// Flags stored under one encoded key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntryResponse {
    /// Printed number; absent for name-level rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "OGN-001/298")]
    pub number: Option<String>,
    /// In the collection.
    pub owned: bool,
    /// Spare copy held.
    pub duplicate: bool,
    /// Foil copy held.
    pub foil: bool,
    /// RFC 3339 time of the last write.
    #[schema(example = "2025-06-01T12:00:00Z")]
    pub updated_at: String,
}

impl From<&CollectionStatus> for StatusEntryResponse {
    fn from(value: &CollectionStatus) -> Self {
        Self {
            number: value.key.number().map(str::to_owned),
            owned: value.flags.owned,
            duplicate: value.flags.duplicate,
            foil: value.flags.foil,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Every stored status keyed by encoded identity (`name` or
/// `name|||number`).
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CollectionResponse(pub BTreeMap<String, StatusEntryResponse>);

impl From<&StatusMap> for CollectionResponse {
    fn from(value: &StatusMap) -> Self {
        Self(
            value
                .iter()
                .map(|status| (status.key.encode(), StatusEntryResponse::from(status)))
                .collect(),
        )
    }
}

/// Upsert request. Omitted flags keep their stored value, or default to
/// `false` when the row is new.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStatusBody {
    /// Card name; required.
    #[schema(example = "Jinx")]
    pub name: Option<String>,
    /// Printed number; omit or leave blank for a name-level status.
    #[schema(example = "OGN-001/298")]
    pub number: Option<String>,
    /// New `owned` value.
    pub owned: Option<bool>,
    /// New `duplicate` value.
    pub duplicate: Option<bool>,
    /// New `foil` value.
    pub foil: Option<bool>,
}

impl UpsertStatusBody {
    fn into_request(self) -> ApiResult<UpsertStatusRequest> {
        let key = parse_card_key(self.name.as_deref(), self.number.as_deref(), NAME_FIELD)?;
        Ok(UpsertStatusRequest {
            key,
            patch: StatusPatch {
                owned: self.owned,
                duplicate: self.duplicate,
                foil: self.foil,
            },
        })
    }
}

/// A stored row returned after a write.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredStatusResponse {
    /// Encoded identity.
    #[schema(example = "Jinx|||OGN-001/298")]
    pub key: String,
    /// Card name.
    pub name: String,
    /// Printed number; absent for name-level rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// In the collection.
    pub owned: bool,
    /// Spare copy held.
    pub duplicate: bool,
    /// Foil copy held.
    pub foil: bool,
    /// RFC 3339 time of the write.
    pub updated_at: String,
}

impl From<CollectionStatus> for StoredStatusResponse {
    fn from(value: CollectionStatus) -> Self {
        Self {
            key: value.key.encode(),
            name: value.key.name().to_owned(),
            number: value.key.number().map(str::to_owned),
            owned: value.flags.owned,
            duplicate: value.flags.duplicate,
            foil: value.flags.foil,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Upsert acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpsertStatusResponse {
    /// Always `true` on success.
    pub ok: bool,
    /// The row as stored.
    pub status: StoredStatusResponse,
}

/// Fetch every stored status.
#[utoipa::path(
    get,
    path = "/api/v1/collection",
    responses(
        (status = 200, description = "Statuses keyed by encoded identity", body = CollectionResponse),
        (status = 503, description = "Collection store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["collection"],
    operation_id = "getCollection"
)]
#[get("/collection")]
pub async fn get_collection(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let statuses = state.collection_query.status_map().await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-cache"))
        .json(CollectionResponse::from(&statuses)))
}

/// Insert or update the status of one card.
#[utoipa::path(
    patch,
    path = "/api/v1/collection",
    request_body = UpsertStatusBody,
    responses(
        (status = 200, description = "Stored status", body = UpsertStatusResponse),
        (status = 400, description = "Missing or invalid card identity", body = ErrorSchema),
        (status = 503, description = "Collection store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["collection"],
    operation_id = "upsertCollectionStatus"
)]
#[patch("/collection")]
pub async fn upsert_status(
    state: web::Data<HttpState>,
    payload: web::Json<UpsertStatusBody>,
) -> ApiResult<web::Json<UpsertStatusResponse>> {
    let request = payload.into_inner().into_request()?;
    let status = state.collection_command.upsert_status(request).await?;
    Ok(web::Json(UpsertStatusResponse {
        ok: true,
        status: StoredStatusResponse::from(status),
    }))
}
