//! Collection maintenance: seeding rows from the catalogue and checking the
//! store against it.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::catalogue_service::CatalogueService;
use crate::domain::collection_service::map_repository_error;
use crate::domain::ports::{
    CollectionAdmin, CollectionRepository, PingReport, SchemaInspector, SchemaInspectorError,
    SyncReport, VerifyReport,
};
use crate::domain::{CardKey, Error};

/// Table holding collection rows.
pub const COLLECTION_TABLE: &str = "collection";

/// Columns `verify` expects on [`COLLECTION_TABLE`].
pub const EXPECTED_COLUMNS: [&str; 6] = ["name", "number", "owned", "duplicate", "foil", "updated_at"];

/// Service implementing [`CollectionAdmin`].
pub struct CollectionAdminService<R, S> {
    repository: Arc<R>,
    inspector: Arc<S>,
    catalogue: Arc<CatalogueService>,
}

impl<R, S> CollectionAdminService<R, S> {
    /// Create a service over the store, its schema, and the catalogue.
    pub fn new(repository: Arc<R>, inspector: Arc<S>, catalogue: Arc<CatalogueService>) -> Self {
        Self {
            repository,
            inspector,
            catalogue,
        }
    }
}

impl<R, S> CollectionAdminService<R, S>
where
    R: CollectionRepository,
    S: SchemaInspector,
{
    async fn catalogue_keys(&self) -> Result<BTreeSet<CardKey>, Error> {
        let parsed = self.catalogue.load().await?;
        Ok(parsed.unique_keys())
    }

    async fn missing_columns(&self) -> (Vec<String>, bool) {
        match self.inspector.table_columns(COLLECTION_TABLE).await {
            Ok(Some(columns)) => {
                let missing = EXPECTED_COLUMNS
                    .iter()
                    .filter(|expected| !columns.iter().any(|column| column == *expected))
                    .map(|expected| (*expected).to_owned())
                    .collect();
                (missing, true)
            }
            Ok(None) => (
                EXPECTED_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
                true,
            ),
            Err(error) => {
                let message = match &error {
                    SchemaInspectorError::Connection { message }
                    | SchemaInspectorError::Query { message } => message.as_str(),
                };
                warn!(error = %message, "schema inspection failed; skipping column check");
                (Vec::new(), false)
            }
        }
    }
}

/// Whether a stored key is backed by the catalogue. A name-level key is
/// backed by any printing of that name.
fn is_catalogued(key: &CardKey, keys: &BTreeSet<CardKey>, names: &BTreeSet<&str>) -> bool {
    if key.number().is_none() {
        names.contains(key.name())
    } else {
        keys.contains(key)
    }
}

#[async_trait]
impl<R, S> CollectionAdmin for CollectionAdminService<R, S>
where
    R: CollectionRepository,
    S: SchemaInspector,
{
    async fn sync(&self) -> Result<SyncReport, Error> {
        let keys: Vec<CardKey> = self.catalogue_keys().await?.into_iter().collect();
        let upserted = self
            .repository
            .insert_missing(&keys)
            .await
            .map_err(map_repository_error)?;
        let total = self.repository.count().await.map_err(map_repository_error)?;
        info!(catalogue = keys.len(), upserted, total, "collection synced");
        Ok(SyncReport {
            catalogue_count: keys.len(),
            upserted,
            total,
        })
    }

    async fn verify(&self) -> Result<VerifyReport, Error> {
        let keys = self.catalogue_keys().await?;
        let rows = self
            .repository
            .fetch_all()
            .await
            .map_err(map_repository_error)?;
        let store_count = self.repository.count().await.map_err(map_repository_error)?;
        let stored: BTreeSet<CardKey> = rows.into_iter().map(|row| row.key).collect();

        let missing: Vec<String> = keys.difference(&stored).map(CardKey::encode).collect();
        let catalogue_names: BTreeSet<&str> = keys.iter().map(CardKey::name).collect();
        let orphan_count = stored
            .iter()
            .filter(|key| !is_catalogued(key, &keys, &catalogue_names))
            .count();
        let (missing_columns, schema_checked) = self.missing_columns().await;

        Ok(VerifyReport {
            catalogue_count: keys.len(),
            store_count,
            missing_count: missing.len(),
            missing,
            orphan_count,
            missing_columns,
            schema_checked,
        })
    }

    async fn ping(&self) -> Result<PingReport, Error> {
        let rows = self.repository.count().await.map_err(map_repository_error)?;
        Ok(PingReport { ok: true, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        CatalogueSourceError, CollectionRepositoryError, MockCatalogueSource,
        MockCollectionRepository, MockSchemaInspector,
    };
    use crate::domain::{CollectionStatus, ErrorCode, StatusFlags};
    use chrono::Utc;

    const CATALOGUE: &str = "N\tName\nA-1\tAshe\nA-2\tAshe\nA-1\tAshe\nJ-1\tJinx\n";

    fn catalogue_from(result: Result<String, CatalogueSourceError>) -> Arc<CatalogueService> {
        let mut source = MockCatalogueSource::new();
        source.expect_load_text().return_once(move || result);
        source.expect_location().return_const("mock".to_owned());
        Arc::new(CatalogueService::new(Arc::new(source)))
    }

    fn row(name: &str, number: Option<&str>) -> CollectionStatus {
        CollectionStatus {
            key: CardKey::new(name, number).expect("key"),
            flags: StatusFlags::default(),
            updated_at: Utc::now(),
        }
    }

    fn inspector_with(columns: Option<Vec<&'static str>>) -> MockSchemaInspector {
        let mut inspector = MockSchemaInspector::new();
        inspector.expect_table_columns().return_once(move |_| {
            Ok(columns.map(|cols| cols.into_iter().map(str::to_owned).collect()))
        });
        inspector
    }

    #[tokio::test]
    async fn sync_inserts_unique_catalogue_keys() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_insert_missing()
            .withf(|keys: &[CardKey]| {
                keys.iter().map(CardKey::encode).collect::<Vec<_>>()
                    == ["Ashe|||A-1", "Ashe|||A-2", "Jinx|||J-1"]
            })
            .times(1)
            .returning(|keys| Ok(keys.len()));
        repo.expect_count().times(1).returning(|| Ok(3));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(MockSchemaInspector::new()),
            catalogue_from(Ok(CATALOGUE.to_owned())),
        );

        let report = service.sync().await.expect("sync");

        assert_eq!(
            report,
            SyncReport {
                catalogue_count: 3,
                upserted: 3,
                total: 3
            }
        );
    }

    #[tokio::test]
    async fn sync_fails_when_catalogue_is_unavailable() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_insert_missing().times(0);
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(MockSchemaInspector::new()),
            catalogue_from(Err(CatalogueSourceError::unavailable("missing"))),
        );

        let error = service.sync().await.expect_err("no catalogue");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn verify_reports_missing_orphans_and_columns() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_fetch_all()
            .return_once(|| Ok(vec![row("Ashe", Some("A-1")), row("Zed", None)]));
        repo.expect_count().return_once(|| Ok(2));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(inspector_with(Some(vec!["name", "number", "owned", "foil"]))),
            catalogue_from(Ok(CATALOGUE.to_owned())),
        );

        let report = service.verify().await.expect("verify");

        assert_eq!(report.catalogue_count, 3);
        assert_eq!(report.store_count, 2);
        assert_eq!(report.missing_count, 2);
        assert_eq!(report.missing, ["Ashe|||A-2", "Jinx|||J-1"]);
        assert_eq!(report.orphan_count, 1);
        assert_eq!(report.missing_columns, ["duplicate", "updated_at"]);
        assert!(report.schema_checked);
    }

    #[tokio::test]
    async fn verify_matches_name_level_rows_against_catalogued_names() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_fetch_all().return_once(|| {
            Ok(vec![
                row("Ashe", None),
                row("Jinx", Some("J-9")),
                row("Zed", None),
            ])
        });
        repo.expect_count().return_once(|| Ok(3));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(inspector_with(Some(EXPECTED_COLUMNS.to_vec()))),
            catalogue_from(Ok(CATALOGUE.to_owned())),
        );

        let report = service.verify().await.expect("verify");

        assert_eq!(report.orphan_count, 2);
        assert_eq!(report.missing_count, 3);
    }

    #[tokio::test]
    async fn verify_reports_stored_row_count_not_decoded_keys() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_fetch_all()
            .return_once(|| Ok(vec![row("Ashe", Some("A-1"))]));
        repo.expect_count().return_once(|| Ok(5));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(inspector_with(Some(EXPECTED_COLUMNS.to_vec()))),
            catalogue_from(Ok(CATALOGUE.to_owned())),
        );

        let report = service.verify().await.expect("verify");

        assert_eq!(report.store_count, 5);
        assert_eq!(report.orphan_count, 0);
    }

    #[tokio::test]
    async fn verify_tolerates_schema_inspection_failure() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_fetch_all().return_once(|| Ok(Vec::new()));
        repo.expect_count().return_once(|| Ok(0));
        let mut inspector = MockSchemaInspector::new();
        inspector
            .expect_table_columns()
            .return_once(|_| Err(SchemaInspectorError::connection("refused")));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(inspector),
            catalogue_from(Ok(CATALOGUE.to_owned())),
        );

        let report = service.verify().await.expect("verify");

        assert!(!report.schema_checked);
        assert!(report.missing_columns.is_empty());
        assert_eq!(report.missing_count, 3);
    }

    #[tokio::test]
    async fn ping_maps_connection_failure_to_unavailable() {
        let mut repo = MockCollectionRepository::new();
        repo.expect_count()
            .return_once(|| Err(CollectionRepositoryError::connection("refused")));
        let service = CollectionAdminService::new(
            Arc::new(repo),
            Arc::new(MockSchemaInspector::new()),
            catalogue_from(Ok(String::new())),
        );

        let error = service.ping().await.expect_err("ping fails");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
