//! Process-wide cache over the reference catalogue.
//!
//! The catalogue is parsed once and kept for the life of the process. A
//! failed load is not cached, so the next caller retries the source.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::ports::{CatalogueSource, CatalogueSourceError};
use crate::domain::{CatalogueParse, Error, parse_catalogue};

/// Loads and caches the parsed catalogue.
pub struct CatalogueService {
    source: Arc<dyn CatalogueSource>,
    cell: OnceCell<Arc<CatalogueParse>>,
}

impl CatalogueService {
    /// Create a service reading from `source`.
    pub fn new(source: Arc<dyn CatalogueSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    fn map_source_error(error: CatalogueSourceError) -> Error {
        match error {
            CatalogueSourceError::Unavailable { message } => {
                Error::service_unavailable(format!("catalogue unavailable: {message}"))
            }
            CatalogueSourceError::Timeout { message } => {
                Error::service_unavailable(format!("catalogue timed out: {message}"))
            }
            CatalogueSourceError::Decode { message } => {
                Error::internal(format!("catalogue unreadable: {message}"))
            }
        }
    }

    async fn fetch(&self) -> Result<Arc<CatalogueParse>, Error> {
        let location = self.source.location();
        let text = self
            .source
            .load_text()
            .await
            .map_err(Self::map_source_error)?;
        let parsed = parse_catalogue(&text);
        for dropped in &parsed.dropped {
            debug!(
                line = dropped.line_number,
                reason = ?dropped.reason,
                "dropped catalogue row"
            );
        }
        info!(
            %location,
            references = parsed.references.len(),
            dropped = parsed.dropped.len(),
            "catalogue loaded"
        );
        Ok(Arc::new(parsed))
    }

    /// The cached catalogue, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` when the source cannot be reached. The
    /// failure is not cached.
    pub async fn load(&self) -> Result<Arc<CatalogueParse>, Error> {
        self.cell.get_or_try_init(|| self.fetch()).await.cloned()
    }

    /// The cached catalogue, or an empty one when loading fails.
    pub async fn load_or_empty(&self) -> Arc<CatalogueParse> {
        match self.load().await {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(
                    location = %self.source.location(),
                    error = %error,
                    "catalogue load failed; serving an empty catalogue"
                );
                Arc::new(CatalogueParse::default())
            }
        }
    }
}
