//! Diesel row types for the `collection` table.
//!
//! These stay internal to the persistence adapter; the domain only sees
//! [`crate::domain::CollectionStatus`].

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::collection;

/// A stored row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collection)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollectionRow {
    pub name: String,
    pub number: String,
    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,
    pub updated_at: DateTime<Utc>,
}

/// Values written when a key has no row yet.
#[derive(Debug, Insertable)]
#[diesel(table_name = collection)]
pub(crate) struct NewCollectionRow<'a> {
    pub name: &'a str,
    pub number: &'a str,
    pub owned: bool,
    pub duplicate: bool,
    pub foil: bool,
    pub updated_at: DateTime<Utc>,
}

/// Columns set when the key already has a row. `None` flags are left as
/// they are.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = collection)]
pub(crate) struct CollectionChangeset {
    pub owned: Option<bool>,
    pub duplicate: Option<bool>,
    pub foil: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
