//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`CollectionRepository`, `CatalogueSource`,
//! `SchemaInspector`) are implemented by outbound adapters. Driving ports
//! (`CollectionQuery`, `CollectionCommand`, `BinderQuery`,
//! `CollectionAdmin`) are implemented by domain services and consumed by the
//! HTTP handlers and the CLI.

mod macros;
pub(crate) use macros::define_port_error;

mod binder_query;
mod catalogue_source;
mod collection_admin;
mod collection_command;
mod collection_query;
mod collection_repository;
mod schema_inspector;

#[cfg(test)]
pub use binder_query::MockBinderQuery;
pub use binder_query::{
    BinderPage, BinderQuery, BinderRequest, BinderScope, CatalogueSnapshot, FixtureBinderQuery,
};
#[cfg(test)]
pub use catalogue_source::MockCatalogueSource;
pub use catalogue_source::{CatalogueSource, CatalogueSourceError, FixtureCatalogueSource};
#[cfg(test)]
pub use collection_admin::MockCollectionAdmin;
pub use collection_admin::{
    CollectionAdmin, FixtureCollectionAdmin, PingReport, SyncReport, VerifyReport,
};
#[cfg(test)]
pub use collection_command::MockCollectionCommand;
pub use collection_command::{CollectionCommand, FixtureCollectionCommand, UpsertStatusRequest};
#[cfg(test)]
pub use collection_query::MockCollectionQuery;
pub use collection_query::{CollectionQuery, FixtureCollectionQuery};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{
    CollectionRepository, CollectionRepositoryError, UnconfiguredCollectionRepository,
};
#[cfg(test)]
pub use schema_inspector::MockSchemaInspector;
pub use schema_inspector::{FixtureSchemaInspector, SchemaInspector, SchemaInspectorError};
