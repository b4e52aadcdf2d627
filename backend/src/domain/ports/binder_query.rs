//! Driving port for the reconciled binder and the parsed catalogue.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{BinderEntry, BinderSummary, CardReference, Error};

/// Which printings a binder page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinderScope {
    /// Every catalogue printing.
    All,
    /// Printings that pass the variant filter.
    #[default]
    Default,
}

/// Request for one binder page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinderRequest {
    /// Case-insensitive substring over name and number.
    pub query: Option<String>,
    /// Printings to include.
    pub scope: BinderScope,
}

/// Reconciled binder entries and their counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinderPage {
    /// Matching entries in catalogue order.
    pub entries: Vec<BinderEntry>,
    /// Counts over `entries`.
    pub summary: BinderSummary,
    /// Statuses could not be read and every entry shows defaults.
    pub degraded: bool,
}

/// The parsed catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueSnapshot {
    /// Accepted references in source order.
    pub references: Vec<CardReference>,
    /// How many rows were dropped while parsing.
    pub dropped_lines: usize,
}

/// Use-case port for reading the binder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BinderQuery: Send + Sync {
    /// Reconcile the catalogue with stored statuses.
    async fn binder(&self, request: BinderRequest) -> Result<BinderPage, Error>;

    /// The parsed catalogue.
    async fn catalogue(&self) -> Result<CatalogueSnapshot, Error>;
}

/// Fixture query over an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBinderQuery;

#[async_trait]
impl BinderQuery for FixtureBinderQuery {
    async fn binder(&self, _request: BinderRequest) -> Result<BinderPage, Error> {
        Ok(BinderPage::default())
    }

    async fn catalogue(&self) -> Result<CatalogueSnapshot, Error> {
        Ok(CatalogueSnapshot::default())
    }
}
