//! PostgreSQL-backed `SchemaInspector` reading `information_schema`.
//!
//! Runs on the blocking pool with the synchronous `postgres` client; the
//! check is an occasional admin call and does not need a pooled connection.

use async_trait::async_trait;
use postgres::{Client, NoTls};

use crate::domain::TraceId;
use crate::domain::ports::{SchemaInspector, SchemaInspectorError};

/// Reads column metadata for tables in the connection's current schema.
#[derive(Clone)]
pub struct PostgresSchemaInspector {
    database_url: String,
}

impl PostgresSchemaInspector {
    /// Construct an inspector from a PostgreSQL connection URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binder::outbound::persistence::PostgresSchemaInspector;
    ///
    /// let inspector = PostgresSchemaInspector::new("postgres://binder@localhost/binder");
    ///
    /// let _ = inspector;
    /// ```
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

fn query_columns(
    database_url: &str,
    table: &str,
) -> Result<Option<Vec<String>>, SchemaInspectorError> {
    let mut client = Client::connect(database_url, NoTls)
        .map_err(|error| SchemaInspectorError::connection(error.to_string()))?;

    let query = concat!(
        "SELECT column_name::text AS column_name ",
        "FROM information_schema.columns ",
        "WHERE table_schema = current_schema() ",
        "  AND table_name = $1 ",
        "ORDER BY ordinal_position"
    );

    let rows = client
        .query(query, &[&table])
        .map_err(|error| SchemaInspectorError::query(error.to_string()))?;

    if rows.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        rows.into_iter().map(|row| row.get("column_name")).collect(),
    ))
}

#[async_trait]
impl SchemaInspector for PostgresSchemaInspector {
    async fn table_columns(
        &self,
        table: &str,
    ) -> Result<Option<Vec<String>>, SchemaInspectorError> {
        let database_url = self.database_url.clone();
        let table = table.to_owned();
        TraceId::spawn_blocking(move || query_columns(&database_url, &table))
            .await
            .map_err(|error| SchemaInspectorError::query(error.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn unreachable_database_is_a_connection_error() {
        let inspector = PostgresSchemaInspector::new("postgres://binder@127.0.0.1:1/binder");

        let error = inspector
            .table_columns("collection")
            .await
            .expect_err("nothing listens on port 1");

        assert!(matches!(error, SchemaInspectorError::Connection { .. }));
    }
}
