//! Driving port for collection maintenance: sync, verify, and ping.
//!
//! Reports are plain serialisable records so the HTTP adapter and the CLI
//! client share one wire shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Outcome of inserting default rows for catalogue printings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Unique catalogue identities considered.
    pub catalogue_count: usize,
    /// Rows inserted by this run.
    pub upserted: usize,
    /// Rows in the store afterwards.
    pub total: u64,
}

/// Consistency report between catalogue and store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// Unique catalogue identities.
    pub catalogue_count: usize,
    /// Rows in the store.
    pub store_count: u64,
    /// Catalogue identities with no row.
    pub missing_count: usize,
    /// Encoded keys of the missing identities.
    pub missing: Vec<String>,
    /// Rows whose identity is not in the catalogue.
    pub orphan_count: usize,
    /// Expected columns absent from the table.
    pub missing_columns: Vec<String>,
    /// Whether the table schema could be inspected.
    pub schema_checked: bool,
}

/// Store connectivity check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingReport {
    /// The store answered.
    pub ok: bool,
    /// Rows in the store.
    pub rows: u64,
}

/// Use-case port for maintenance operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionAdmin: Send + Sync {
    /// Insert a default row for every catalogue identity without one.
    async fn sync(&self) -> Result<SyncReport, Error>;

    /// Compare catalogue, store rows, and table schema without writing.
    async fn verify(&self) -> Result<VerifyReport, Error>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<PingReport, Error>;
}

/// Fixture admin over an empty catalogue and store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCollectionAdmin;

#[async_trait]
impl CollectionAdmin for FixtureCollectionAdmin {
    async fn sync(&self) -> Result<SyncReport, Error> {
        Ok(SyncReport::default())
    }

    async fn verify(&self) -> Result<VerifyReport, Error> {
        Ok(VerifyReport::default())
    }

    async fn ping(&self) -> Result<PingReport, Error> {
        Ok(PingReport { ok: true, rows: 0 })
    }
}
