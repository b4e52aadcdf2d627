//! Driving port for reading stored card statuses.

use async_trait::async_trait;

use crate::domain::{Error, StatusMap};

/// Use-case port for reading the status mapping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionQuery: Send + Sync {
    /// Every stored status keyed by identity.
    async fn status_map(&self) -> Result<StatusMap, Error>;
}

/// Fixture query with no stored statuses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionQuery;

#[async_trait]
impl CollectionQuery for FixtureCollectionQuery {
    async fn status_map(&self) -> Result<StatusMap, Error> {
        Ok(StatusMap::default())
    }
}
