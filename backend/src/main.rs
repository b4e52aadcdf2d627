//! Binder server entry-point: loads settings, prepares the store, and serves
//! the REST API with health probes and OpenAPI docs.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use binder::TraceId;
use binder::domain::ports::CatalogueSource;
use binder::inbound::http::health::HealthState;
use binder::outbound::catalogue::{FileCatalogueSource, HttpCatalogueSource};
use binder::outbound::persistence::{DbPool, run_migrations};

use server::settings::{CatalogueLocation, ServerSettings};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_config(&settings).await?;

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting binder server");
    let server = create_server(health_state, config)?;
    server.await
}

async fn build_config(settings: &ServerSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let variants = settings.variant_filter().map_err(io::Error::other)?;
    let catalogue = catalogue_source(settings)?;

    let config = ServerConfig::new(bind_addr)
        .with_catalogue(catalogue)
        .with_variant_filter(variants);

    let Some(database_url) = settings.database_url() else {
        warn!("BINDER_DATABASE_URL not set; statuses will not be persisted");
        return Ok(config);
    };

    let url = database_url.to_owned();
    let applied = TraceId::spawn_blocking(move || run_migrations(&url))
        .await
        .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
        .map_err(io::Error::other)?;
    info!(count = applied.len(), "database migrations applied");

    let pool = DbPool::new(settings.pool_config(database_url))
        .await
        .map_err(|e| io::Error::other(format!("failed to build database pool: {e}")))?;
    Ok(config.with_db_pool(pool, database_url))
}

fn catalogue_source(settings: &ServerSettings) -> io::Result<Arc<dyn CatalogueSource>> {
    match settings.catalogue_location().map_err(io::Error::other)? {
        CatalogueLocation::File(path) => Ok(Arc::new(FileCatalogueSource::new(path))),
        CatalogueLocation::Url(url) => {
            let source = HttpCatalogueSource::new(url, settings.catalogue_timeout())
                .map_err(|e| io::Error::other(format!("failed to build catalogue client: {e}")))?;
            Ok(Arc::new(source))
        }
    }
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("binder")
        .endpoint("/metrics")
        .build()
        .map_err(|e| io::Error::other(format!("failed to configure Prometheus metrics: {e}")))
}
