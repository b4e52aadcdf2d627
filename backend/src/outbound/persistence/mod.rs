//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the collection ports backed by PostgreSQL via
//! `diesel-async` and `bb8` pooling, plus a synchronous `postgres` client
//! for schema inspection.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! internal; adapters translate them to domain types and map every database
//! error into the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use binder::outbound::persistence::{DbPool, DieselCollectionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/binder")).await?;
//! let repo = DieselCollectionRepository::new(pool);
//! ```

mod diesel_collection_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod postgres_schema_inspector;
mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
pub use postgres_schema_inspector::PostgresSchemaInspector;
