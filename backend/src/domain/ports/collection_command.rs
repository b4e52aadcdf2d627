//! Driving port for writing card statuses.
//!
//! Inbound adapters and the binder session use this port to upsert a status
//! without knowing whether it lands in the local store or a remote server.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{CardKey, CollectionStatus, Error, StatusPatch};

/// Request to upsert the flags stored under one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStatusRequest {
    /// Identity to write.
    pub key: CardKey,
    /// Flags to change.
    pub patch: StatusPatch,
}

/// Use-case port for status writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    /// Insert or update the status for `request.key` and return the stored row.
    async fn upsert_status(&self, request: UpsertStatusRequest)
    -> Result<CollectionStatus, Error>;
}

/// Fixture command that echoes the patch as if it were freshly inserted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionCommand;

#[async_trait]
impl CollectionCommand for FixtureCollectionCommand {
    async fn upsert_status(
        &self,
        request: UpsertStatusRequest,
    ) -> Result<CollectionStatus, Error> {
        Ok(CollectionStatus {
            flags: request.patch.insert_flags(),
            key: request.key,
            updated_at: Utc::now(),
        })
    }
}
