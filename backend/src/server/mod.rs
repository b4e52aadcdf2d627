//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
pub(crate) mod settings;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use binder::Trace;
#[cfg(debug_assertions)]
use binder::doc::ApiDoc;
use binder::inbound::http::admin::{ping, sync, verify};
use binder::inbound::http::binder::{get_binder, get_catalogue};
use binder::inbound::http::collection::{get_collection, upsert_status};
use binder::inbound::http::health::{HealthState, live, ready};
use binder::inbound::http::state::HttpState;
use binder::inbound::http::{json_error_handler, query_error_handler};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(get_collection)
        .service(upsert_status)
        .service(get_catalogue)
        .service(get_binder)
        .service(sync)
        .service(verify)
        .service(ping);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Routing coverage for the assembled application.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use binder::inbound::http::state::HttpStatePorts;
    use serde_json::Value;

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(HttpState::new(HttpStatePorts::default())),
        }
    }

    #[actix_web::test]
    async fn api_routes_are_mounted_under_v1() {
        let app = actix_test::init_service(build_app(deps())).await;
        for path in [
            "/api/v1/collection",
            "/api/v1/catalogue",
            "/api/v1/binder",
            "/api/v1/admin/verify",
            "/api/v1/admin/ping",
            "/health/ready",
            "/health/live",
        ] {
            let request = actix_test::TestRequest::get().uri(path).to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        }
    }

    #[actix_web::test]
    async fn without_database_writes_fail_and_binder_degrades() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let config = ServerConfig::new(([127, 0, 0, 1], 0).into());
        let app = actix_test::init_service(build_app(AppDependencies {
            health_state,
            http_state: build_http_state(&config),
        }))
        .await;

        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/collection")
            .set_json(serde_json::json!({"name": "Jinx", "owned": true}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "service_unavailable");

        for request in [
            actix_test::TestRequest::post().uri("/api/v1/admin/sync"),
            actix_test::TestRequest::get().uri("/api/v1/admin/ping"),
        ] {
            let response = actix_test::call_service(&app, request.to_request()).await;
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        }

        let request = actix_test::TestRequest::get()
            .uri("/api/v1/binder")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["degraded"], true);
    }

    #[actix_web::test]
    async fn malformed_patch_body_uses_error_envelope() {
        let app = actix_test::init_service(build_app(deps())).await;
        let request = actix_test::TestRequest::patch()
            .uri("/api/v1/collection")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }
}
