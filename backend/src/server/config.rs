//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use binder::domain::VariantFilter;
use binder::domain::ports::{CatalogueSource, FixtureCatalogueSource};
use binder::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) database_url: Option<String>,
    pub(crate) catalogue: Arc<dyn CatalogueSource>,
    pub(crate) variants: VariantFilter,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration with an empty catalogue, the default variant filter,
    /// and no database.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            database_url: None,
            catalogue: Arc::new(FixtureCatalogueSource),
            variants: VariantFilter::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach the store. `database_url` is also used for schema
    /// inspection, which runs outside the pool.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool, database_url: impl Into<String>) -> Self {
        self.db_pool = Some(pool);
        self.database_url = Some(database_url.into());
        self
    }

    /// Read the catalogue from `source`.
    #[must_use]
    pub fn with_catalogue(mut self, source: Arc<dyn CatalogueSource>) -> Self {
        self.catalogue = source;
        self
    }

    /// Filter applied to the default binder view.
    #[must_use]
    pub fn with_variant_filter(mut self, variants: VariantFilter) -> Self {
        self.variants = variants;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
