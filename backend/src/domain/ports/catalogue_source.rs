//! Driven port for fetching the raw reference catalogue.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while fetching catalogue text.
    pub enum CatalogueSourceError {
        /// The source could not be read or reached.
        Unavailable { message: String } => "catalogue source unavailable: {message}",
        /// The source did not answer in time.
        Timeout { message: String } => "catalogue source timed out: {message}",
        /// The source answered with content that is not UTF-8 text.
        Decode { message: String } => "catalogue source returned unreadable content: {message}",
    }
}

/// Supplies the tab-separated catalogue text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Fetch the full catalogue text.
    async fn load_text(&self) -> Result<String, CatalogueSourceError>;

    /// Where the catalogue comes from, for logs.
    fn location(&self) -> String;
}

/// Fixture source yielding an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueSource;

#[async_trait]
impl CatalogueSource for FixtureCatalogueSource {
    async fn load_text(&self) -> Result<String, CatalogueSourceError> {
        Ok(String::new())
    }

    fn location(&self) -> String {
        "fixture".to_owned()
    }
}
