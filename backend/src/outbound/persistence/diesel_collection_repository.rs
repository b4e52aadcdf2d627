//! PostgreSQL-backed `CollectionRepository` implementation using Diesel ORM.
//!
//! Status writes are a single `INSERT .. ON CONFLICT (name, number) DO
//! UPDATE` so concurrent toggles on one key never race between a read and a
//! branch. Name-level keys are stored with an empty `number`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{CardKey, CollectionStatus, StatusFlags, StatusPatch};

use super::error_mapping;
use super::models::{CollectionChangeset, CollectionRow, NewCollectionRow};
use super::pool::{DbPool, PoolError};
use super::schema::collection;

/// Rows per statement when seeding missing keys.
const INSERT_CHUNK: usize = 500;

/// Diesel-backed implementation of the `CollectionRepository` port.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollectionRepositoryError {
    error_mapping::map_pool_error(error, CollectionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CollectionRepositoryError {
    error_mapping::map_diesel_error(
        error,
        CollectionRepositoryError::query,
        CollectionRepositoryError::connection,
    )
}

/// Stored form of a key's number column.
fn stored_number(key: &CardKey) -> &str {
    key.number().unwrap_or_default()
}

/// Convert a row to a domain status. Rows whose name fails validation are
/// reported and skipped.
fn row_to_status(row: CollectionRow) -> Option<CollectionStatus> {
    match CardKey::new(&row.name, Some(&row.number)) {
        Ok(key) => Some(CollectionStatus {
            key,
            flags: StatusFlags {
                owned: row.owned,
                duplicate: row.duplicate,
                foil: row.foil,
            },
            updated_at: row.updated_at,
        }),
        Err(error) => {
            warn!(name = %row.name, number = %row.number, %error, "skipping invalid collection row");
            None
        }
    }
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn fetch_all(&self) -> Result<Vec<CollectionStatus>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CollectionRow> = collection::table
            .select(CollectionRow::as_select())
            .order((collection::name.asc(), collection::number.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_status).collect())
    }

    async fn upsert(
        &self,
        key: &CardKey,
        patch: &StatusPatch,
    ) -> Result<CollectionStatus, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let now = Utc::now();
        let flags = patch.insert_flags();
        let new_row = NewCollectionRow {
            name: key.name(),
            number: stored_number(key),
            owned: flags.owned,
            duplicate: flags.duplicate,
            foil: flags.foil,
            updated_at: now,
        };
        let changeset = CollectionChangeset {
            owned: patch.owned,
            duplicate: patch.duplicate,
            foil: patch.foil,
            updated_at: now,
        };

        let row: CollectionRow = diesel::insert_into(collection::table)
            .values(&new_row)
            .on_conflict((collection::name, collection::number))
            .do_update()
            .set(&changeset)
            .returning(CollectionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(CollectionStatus {
            key: key.clone(),
            flags: StatusFlags {
                owned: row.owned,
                duplicate: row.duplicate,
                foil: row.foil,
            },
            updated_at: row.updated_at,
        })
    }

    async fn insert_missing(&self, keys: &[CardKey]) -> Result<usize, CollectionRepositoryError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let now = Utc::now();
        let mut inserted = 0;
        for chunk in keys.chunks(INSERT_CHUNK) {
            let rows: Vec<NewCollectionRow<'_>> = chunk
                .iter()
                .map(|key| NewCollectionRow {
                    name: key.name(),
                    number: stored_number(key),
                    owned: false,
                    duplicate: false,
                    foil: false,
                    updated_at: now,
                })
                .collect();

            inserted += diesel::insert_into(collection::table)
                .values(&rows)
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        Ok(inserted)
    }

    async fn count(&self) -> Result<u64, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = collection::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total).map_err(|_| CollectionRepositoryError::query("negative row count"))
    }
}
