//! Diesel table definitions for the collection store.
//!
//! Kept in step with `backend/migrations` by hand.

diesel::table! {
    /// One status row per card identity. An empty `number` stores a
    /// name-level key.
    collection (name, number) {
        name -> Text,
        number -> Text,
        owned -> Bool,
        duplicate -> Bool,
        foil -> Bool,
        updated_at -> Timestamptz,
    }
}
