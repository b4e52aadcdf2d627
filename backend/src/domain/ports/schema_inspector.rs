//! Driven port for introspecting the live store schema.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading schema metadata.
    pub enum SchemaInspectorError {
        /// The database could not be reached.
        Connection { message: String } => "schema inspection connection failed: {message}",
        /// The catalogue query failed.
        Query { message: String } => "schema inspection query failed: {message}",
    }
}

/// Read-only access to table metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaInspector: Send + Sync {
    /// Column names of `table` in ordinal order, or `None` when the table
    /// does not exist.
    async fn table_columns(&self, table: &str)
    -> Result<Option<Vec<String>>, SchemaInspectorError>;
}

/// Fixture inspector that reports every table as absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSchemaInspector;

#[async_trait]
impl SchemaInspector for FixtureSchemaInspector {
    async fn table_columns(
        &self,
        _table: &str,
    ) -> Result<Option<Vec<String>>, SchemaInspectorError> {
        Ok(None)
    }
}
