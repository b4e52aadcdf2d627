//! Server-side reconciliation of catalogue and stored statuses.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::catalogue_service::CatalogueService;
use crate::domain::collection_service::map_repository_error;
use crate::domain::ports::{
    BinderPage, BinderQuery, BinderRequest, BinderScope, CatalogueSnapshot, CollectionRepository,
};
use crate::domain::{BinderSummary, BinderView, Error, StatusMap, VariantFilter};

/// Service implementing [`BinderQuery`].
pub struct BinderService<R> {
    repository: Arc<R>,
    catalogue: Arc<CatalogueService>,
    variants: VariantFilter,
}

impl<R> BinderService<R> {
    /// Create a service joining `catalogue` with rows from `repository`.
    pub fn new(
        repository: Arc<R>,
        catalogue: Arc<CatalogueService>,
        variants: VariantFilter,
    ) -> Self {
        Self {
            repository,
            catalogue,
            variants,
        }
    }
}

impl<R> BinderService<R>
where
    R: CollectionRepository,
{
    async fn statuses_or_empty(&self) -> (StatusMap, bool) {
        match self.repository.fetch_all().await {
            Ok(rows) => (StatusMap::from_statuses(rows), false),
            Err(error) => {
                let error = map_repository_error(error);
                warn!(
                    code = ?error.code(),
                    error = %error,
                    "status read failed; serving default flags"
                );
                (StatusMap::default(), true)
            }
        }
    }
}

#[async_trait]
impl<R> BinderQuery for BinderService<R>
where
    R: CollectionRepository,
{
    async fn binder(&self, request: BinderRequest) -> Result<BinderPage, Error> {
        let (catalogue, (statuses, degraded)) =
            tokio::join!(self.catalogue.load_or_empty(), self.statuses_or_empty());

        let view = BinderView::reconcile(&catalogue.references, &statuses);
        let view = match request.scope {
            BinderScope::All => view,
            BinderScope::Default => view.without_variants(&self.variants),
        };
        let entries: Vec<_> = view
            .filter(request.query.as_deref().unwrap_or_default())
            .cloned()
            .collect();
        let summary = BinderSummary::from_entries(&entries);

        Ok(BinderPage {
            entries,
            summary,
            degraded,
        })
    }

    async fn catalogue(&self) -> Result<CatalogueSnapshot, Error> {
        let parsed = self.catalogue.load_or_empty().await;
        Ok(CatalogueSnapshot {
            references: parsed.references.clone(),
            dropped_lines: parsed.dropped.len(),
        })
    }
}
