//! Per-test databases on an embedded PostgreSQL cluster.
//!
//! Each suite gets its own cluster and a freshly created database with the
//! binder migrations applied through `run_migrations`, so the schema under
//! test is exactly the one the server installs at startup. Database creation
//! and schema surgery use the sync `postgres` client.

use binder::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;
use super::pg_embed::test_cluster;

/// A migrated database that lives as long as its cluster.
pub struct EmbeddedDatabase {
    url: String,
    _cluster: TestCluster,
}

impl EmbeddedDatabase {
    /// Connection URL of the database.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run raw SQL, for simulating schema drift.
    pub fn execute(&self, sql: &str) -> Result<(), String> {
        let mut client =
            Client::connect(&self.url, NoTls).map_err(|err| format_postgres_error(&err))?;
        client
            .batch_execute(sql)
            .map_err(|err| format_postgres_error(&err))
    }
}

/// Start a cluster, create a uniquely named database, and migrate it.
pub fn provision_database() -> Result<EmbeddedDatabase, String> {
    let cluster = test_cluster()?;
    let name = format!("binder_test_{}", Uuid::new_v4().simple());

    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;

    let url = cluster.connection().database_url(&name);
    run_migrations(&url).map_err(|err| err.to_string())?;
    Ok(EmbeddedDatabase {
        url,
        _cluster: cluster,
    })
}
