//! Collection status services.
//!
//! Implements the read and write driving ports over a
//! [`CollectionRepository`], translating store failures into domain errors.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CollectionCommand, CollectionQuery, CollectionRepository, CollectionRepositoryError,
    UpsertStatusRequest,
};
use crate::domain::{CollectionStatus, Error, StatusMap};

/// Service implementing [`CollectionQuery`] and [`CollectionCommand`].
#[derive(Clone)]
pub struct CollectionService<R> {
    repository: Arc<R>,
}

impl<R> CollectionService<R> {
    /// Create a new service over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

/// Translate a store failure into a domain error.
///
/// Connection failures are retryable and surface as `ServiceUnavailable`;
/// anything else is an internal error.
pub(crate) fn map_repository_error(error: CollectionRepositoryError) -> Error {
    match error {
        CollectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("collection store unavailable: {message}"))
        }
        CollectionRepositoryError::Query { message } => {
            Error::internal(format!("collection store error: {message}"))
        }
    }
}

#[async_trait]
impl<R> CollectionQuery for CollectionService<R>
where
    R: CollectionRepository,
{
    async fn status_map(&self) -> Result<StatusMap, Error> {
        let statuses = self
            .repository
            .fetch_all()
            .await
            .map_err(map_repository_error)?;
        Ok(StatusMap::from_statuses(statuses))
    }
}

#[async_trait]
impl<R> CollectionCommand for CollectionService<R>
where
    R: CollectionRepository,
{
    async fn upsert_status(
        &self,
        request: UpsertStatusRequest,
    ) -> Result<CollectionStatus, Error> {
        self.repository
            .upsert(&request.key, &request.patch)
            .await
            .map_err(map_repository_error)
    }
}
