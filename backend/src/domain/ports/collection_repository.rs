//! Driven port for the persisted status store.
//!
//! The store holds one row per [`CardKey`]. Writes are single-statement
//! upserts so concurrent toggles on the same key resolve as last write wins
//! without a read-then-branch race.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{CardKey, CollectionStatus, StatusPatch};

define_port_error! {
    /// Errors raised by collection store adapters.
    pub enum CollectionRepositoryError {
        /// The store could not be reached or a connection could not be checked out.
        Connection { message: String } => "collection store connection failed: {message}",
        /// A statement failed once connected.
        Query { message: String } => "collection store query failed: {message}",
    }
}

/// Persistence contract for card statuses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Every stored row, ordered by name then number.
    async fn fetch_all(&self) -> Result<Vec<CollectionStatus>, CollectionRepositoryError>;

    /// Insert the row for `key` with `patch` over all-false defaults, or
    /// update only the supplied flags when it exists. Refreshes `updated_at`
    /// either way and returns the stored row.
    async fn upsert(
        &self,
        key: &CardKey,
        patch: &StatusPatch,
    ) -> Result<CollectionStatus, CollectionRepositoryError>;

    /// Insert all-false rows for keys without one. Existing rows are left
    /// untouched. Returns how many rows were inserted.
    async fn insert_missing(&self, keys: &[CardKey]) -> Result<usize, CollectionRepositoryError>;

    /// Total number of stored rows.
    async fn count(&self) -> Result<u64, CollectionRepositoryError>;
}

/// Store wired when no database is configured.
///
/// Every call fails with [`CollectionRepositoryError::Connection`], so writes
/// surface as unavailable and reads degrade instead of acknowledging data
/// that is never kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCollectionRepository;

impl UnconfiguredCollectionRepository {
    fn unavailable() -> CollectionRepositoryError {
        CollectionRepositoryError::connection("no database configured")
    }
}

#[async_trait]
impl CollectionRepository for UnconfiguredCollectionRepository {
    async fn fetch_all(&self) -> Result<Vec<CollectionStatus>, CollectionRepositoryError> {
        Err(Self::unavailable())
    }

    async fn upsert(
        &self,
        _key: &CardKey,
        _patch: &StatusPatch,
    ) -> Result<CollectionStatus, CollectionRepositoryError> {
        Err(Self::unavailable())
    }

    async fn insert_missing(&self, _keys: &[CardKey]) -> Result<usize, CollectionRepositoryError> {
        Err(Self::unavailable())
    }

    async fn count(&self) -> Result<u64, CollectionRepositoryError> {
        Err(Self::unavailable())
    }
}
