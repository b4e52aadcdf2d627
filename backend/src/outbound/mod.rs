//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL status store and schema inspection
//! - **catalogue**: catalogue text from a file or an HTTP URL
//! - **http_client**: the binder HTTP API seen from the CLI
//!
//! Adapters translate between domain types and infrastructure
//! representations and map failures into port errors. They contain no
//! business logic.

pub mod catalogue;
pub mod http_client;
pub mod persistence;
