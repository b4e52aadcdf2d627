//! Catalogue source adapters.
//!
//! Thin implementations of the `CatalogueSource` port for a local file and
//! an HTTP URL.

mod file_source;
mod http_source;

pub use file_source::FileCatalogueSource;
pub use http_source::{DEFAULT_CATALOGUE_TIMEOUT, HttpCatalogueSource};
