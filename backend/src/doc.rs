//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound layer together
//! with the schema wrappers for domain types ([`ErrorSchema`],
//! [`ErrorCodeSchema`], [`CardReferenceSchema`]). Response bodies are
//! collected from the path annotations.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{CardReferenceSchema, ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Binder API",
        description = "Card collection tracking: catalogue, per-card status, and maintenance."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::collection::get_collection,
        crate::inbound::http::collection::upsert_status,
        crate::inbound::http::binder::get_catalogue,
        crate::inbound::http::binder::get_binder,
        crate::inbound::http::admin::sync,
        crate::inbound::http::admin::verify,
        crate::inbound::http::admin::ping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema, CardReferenceSchema)),
    tags(
        (name = "collection", description = "Per-card ownership status"),
        (name = "binder", description = "Catalogue and reconciled binder views"),
        (name = "admin", description = "Store maintenance and diagnostics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn openapi_registers_every_api_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/collection",
            "/api/v1/catalogue",
            "/api/v1/binder",
            "/api/v1/admin/sync",
            "/api/v1/admin/verify",
            "/api/v1/admin/ping",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn collection_path_exposes_get_and_patch() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/collection").expect("path");
        assert!(item.get.is_some());
        assert!(item.patch.is_some());
    }
}
