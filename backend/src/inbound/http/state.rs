//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend
//! only on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BinderQuery, CollectionAdmin, CollectionCommand, CollectionQuery, FixtureBinderQuery,
    FixtureCollectionAdmin, FixtureCollectionCommand, FixtureCollectionQuery,
};

/// Parameter object bundling the port implementations for handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Status reads.
    pub collection_query: Arc<dyn CollectionQuery>,
    /// Status writes.
    pub collection_command: Arc<dyn CollectionCommand>,
    /// Catalogue and reconciled binder.
    pub binder: Arc<dyn BinderQuery>,
    /// Sync, verify, and ping.
    pub admin: Arc<dyn CollectionAdmin>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            collection_query: Arc::new(FixtureCollectionQuery),
            collection_command: Arc::new(FixtureCollectionCommand),
            binder: Arc::new(FixtureBinderQuery),
            admin: Arc::new(FixtureCollectionAdmin),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Status reads.
    pub collection_query: Arc<dyn CollectionQuery>,
    /// Status writes.
    pub collection_command: Arc<dyn CollectionCommand>,
    /// Catalogue and reconciled binder.
    pub binder: Arc<dyn BinderQuery>,
    /// Sync, verify, and ping.
    pub admin: Arc<dyn CollectionAdmin>,
}

impl HttpState {
    /// Build state from its ports.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            collection_query,
            collection_command,
            binder,
            admin,
        } = ports;
        Self {
            collection_query,
            collection_command,
            binder,
            admin,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
