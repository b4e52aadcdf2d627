//! Persisted ownership status for a card identity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card_key::{CardKey, KeyScheme};

/// Ownership flags tracked per card. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusFlags {
    /// The card is in the collection.
    pub owned: bool,
    /// A spare copy is held.
    pub duplicate: bool,
    /// A foil copy is held.
    pub foil: bool,
}

/// Partial update of [`StatusFlags`]. `None` leaves a flag untouched.
///
/// # Examples
/// ```
/// use binder::domain::{StatusFlags, StatusPatch};
///
/// let current = StatusFlags { owned: true, duplicate: false, foil: false };
/// let patch = StatusPatch { foil: Some(true), ..StatusPatch::default() };
/// assert_eq!(
///     patch.apply_to(current),
///     StatusFlags { owned: true, duplicate: false, foil: true }
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPatch {
    /// New `owned` value, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    /// New `duplicate` value, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,
    /// New `foil` value, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foil: Option<bool>,
}

impl StatusPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owned.is_none() && self.duplicate.is_none() && self.foil.is_none()
    }

    /// Overlay the supplied flags onto `current`.
    #[must_use]
    pub fn apply_to(&self, current: StatusFlags) -> StatusFlags {
        StatusFlags {
            owned: self.owned.unwrap_or(current.owned),
            duplicate: self.duplicate.unwrap_or(current.duplicate),
            foil: self.foil.unwrap_or(current.foil),
        }
    }

    /// Flags written when the key has no row yet.
    #[must_use]
    pub fn insert_flags(&self) -> StatusFlags {
        self.apply_to(StatusFlags::default())
    }
}

/// A stored status row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStatus {
    /// Identity the row is stored under.
    pub key: CardKey,
    /// Current flags.
    #[serde(flatten)]
    pub flags: StatusFlags,
    /// Time of the last successful write.
    pub updated_at: DateTime<Utc>,
}

/// How a status was matched to a catalogue printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusSource {
    /// A printing-level row for the exact `(name, number)`.
    Exact,
    /// A name-level row broadcast to every printing of the name.
    Name,
    /// No row; all flags default to `false`.
    Default,
}

/// Status rows indexed by identity, ordered by name then number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
    entries: BTreeMap<CardKey, CollectionStatus>,
}

impl StatusMap {
    /// Index rows by key. Later rows replace earlier ones with the same key.
    pub fn from_statuses(statuses: impl IntoIterator<Item = CollectionStatus>) -> Self {
        Self {
            entries: statuses
                .into_iter()
                .map(|status| (status.key.clone(), status))
                .collect(),
        }
    }

    /// Row stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &CardKey) -> Option<&CollectionStatus> {
        self.entries.get(key)
    }

    /// Whether a row exists for exactly `key`.
    #[must_use]
    pub fn contains(&self, key: &CardKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolve the flags that apply to a catalogue printing.
    ///
    /// An exact printing row wins over a name-level row; with neither the
    /// flags default to `false`.
    #[must_use]
    pub fn resolve(&self, key: &CardKey) -> (StatusFlags, StatusSource) {
        if let Some(status) = self.entries.get(key) {
            let source = match key.scheme() {
                KeyScheme::Printing => StatusSource::Exact,
                KeyScheme::Name => StatusSource::Name,
            };
            return (status.flags, source);
        }
        self.entries
            .get(&key.to_name_level())
            .map_or((StatusFlags::default(), StatusSource::Default), |status| {
                (status.flags, StatusSource::Name)
            })
    }

    /// Insert or replace a row.
    pub fn insert(&mut self, status: CollectionStatus) {
        self.entries.insert(status.key.clone(), status);
    }

    /// Iterate rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = &CollectionStatus> {
        self.entries.values()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
