//! Builders wiring domain services onto adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use binder::domain::ports::{
    CollectionRepository, FixtureSchemaInspector, SchemaInspector, UnconfiguredCollectionRepository,
};
use binder::domain::{
    BinderService, CatalogueService, CollectionAdminService, CollectionService, VariantFilter,
};
use binder::inbound::http::state::{HttpState, HttpStatePorts};
use binder::outbound::persistence::{DieselCollectionRepository, PostgresSchemaInspector};

use super::ServerConfig;

/// Build every driving port over one repository and inspector.
fn collection_ports<R, S>(
    repository: Arc<R>,
    inspector: Arc<S>,
    catalogue: Arc<CatalogueService>,
    variants: VariantFilter,
) -> HttpStatePorts
where
    R: CollectionRepository + 'static,
    S: SchemaInspector + 'static,
{
    let collection = Arc::new(CollectionService::new(Arc::clone(&repository)));
    HttpStatePorts {
        collection_query: collection.clone(),
        collection_command: collection,
        binder: Arc::new(BinderService::new(
            Arc::clone(&repository),
            Arc::clone(&catalogue),
            variants,
        )),
        admin: Arc::new(CollectionAdminService::new(repository, inspector, catalogue)),
    }
}

/// Build HTTP state backed by PostgreSQL when a pool is configured.
/// Without one, store operations answer as unavailable.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let catalogue = Arc::new(CatalogueService::new(Arc::clone(&config.catalogue)));
    info!(location = %config.catalogue.location(), "catalogue source configured");

    let ports = match (&config.db_pool, &config.database_url) {
        (Some(pool), Some(database_url)) => collection_ports(
            Arc::new(DieselCollectionRepository::new(pool.clone())),
            Arc::new(PostgresSchemaInspector::new(database_url.clone())),
            catalogue,
            config.variants.clone(),
        ),
        _ => {
            warn!("no database configured; collection writes will be rejected");
            collection_ports(
                Arc::new(UnconfiguredCollectionRepository),
                Arc::new(FixtureSchemaInspector),
                catalogue,
                config.variants.clone(),
            )
        }
    };
    web::Data::new(HttpState::new(ports))
}
