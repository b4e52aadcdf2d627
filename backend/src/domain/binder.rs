//! Reconciliation of the reference catalogue against stored statuses.
//!
//! [`BinderView`] holds one entry per catalogue printing, in catalogue order,
//! with the flags that apply to it. Views are derived data: filtering borrows
//! and never mutates, while optimistic updates return an
//! [`OptimisticUpdate`] so they can be rolled back.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::card_key::{CardKey, KeyScheme};
use super::catalogue::CardReference;
use super::collection_status::{CollectionStatus, StatusFlags, StatusMap, StatusPatch, StatusSource};
use super::variant_filter::VariantFilter;

/// A catalogue printing with its resolved status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderEntry {
    /// The printing shown.
    pub reference: CardReference,
    /// Flags that apply to the printing.
    pub flags: StatusFlags,
    /// Which status row supplied the flags.
    pub source: StatusSource,
}

impl BinderEntry {
    /// Identity of the printing.
    #[must_use]
    pub fn key(&self) -> &CardKey {
        self.reference.key()
    }

    fn matches(&self, needle: &str) -> bool {
        self.reference.name().to_lowercase().contains(needle)
            || self
                .reference
                .number()
                .is_some_and(|number| number.to_lowercase().contains(needle))
    }
}

/// Counts over a set of binder entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinderSummary {
    /// Entries considered.
    pub total: usize,
    /// Distinct identities among them.
    pub unique: usize,
    /// Entries marked owned.
    pub owned: usize,
    /// Entries marked duplicate.
    pub duplicate: usize,
    /// Entries marked foil.
    pub foil: usize,
}

impl BinderSummary {
    /// Summarise entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a BinderEntry>) -> Self {
        let mut summary = Self::default();
        let mut keys = BTreeSet::new();
        for entry in entries {
            summary.total += 1;
            keys.insert(entry.key());
            summary.owned += usize::from(entry.flags.owned);
            summary.duplicate += usize::from(entry.flags.duplicate);
            summary.foil += usize::from(entry.flags.foil);
        }
        summary.unique = keys.len();
        summary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntryState {
    flags: StatusFlags,
    source: StatusSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryChange {
    index: usize,
    before: EntryState,
    after: EntryState,
}

/// Record of a local change, used to undo it if the write fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimisticUpdate {
    changes: Vec<EntryChange>,
}

impl OptimisticUpdate {
    /// Number of entries the update touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the update touched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Per-printing view of the catalogue with resolved statuses.
///
/// # Examples
/// ```
/// use binder::domain::{BinderView, CardReference, StatusMap};
///
/// let catalogue = vec![CardReference::new("Ashe", Some("A-1")).expect("reference")];
/// let view = BinderView::reconcile(&catalogue, &StatusMap::default());
/// assert!(!view.entries()[0].flags.owned);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinderView {
    entries: Vec<BinderEntry>,
}

impl BinderView {
    /// Join catalogue printings with stored statuses.
    ///
    /// An exact printing row wins; otherwise a name-level row is broadcast to
    /// every printing of the name; otherwise flags default to `false`. Rows
    /// for cards absent from the catalogue are ignored.
    #[must_use]
    pub fn reconcile(catalogue: &[CardReference], statuses: &StatusMap) -> Self {
        let entries = catalogue
            .iter()
            .map(|reference| {
                let (flags, source) = statuses.resolve(reference.key());
                BinderEntry {
                    reference: reference.clone(),
                    flags,
                    source,
                }
            })
            .collect();
        Self { entries }
    }

    /// All entries in catalogue order.
    #[must_use]
    pub fn entries(&self) -> &[BinderEntry] {
        &self.entries
    }

    /// Entries whose name or number contains `query`, ignoring case.
    ///
    /// A blank query matches everything.
    pub fn filter(&self, query: &str) -> impl Iterator<Item = &BinderEntry> + '_ {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |entry| needle.is_empty() || entry.matches(&needle))
    }

    /// A new view without variant and overnumbered printings.
    #[must_use]
    pub fn without_variants(&self, filter: &VariantFilter) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| filter.is_displayed(&entry.reference))
                .cloned()
                .collect(),
        }
    }

    /// Counts over the whole view.
    #[must_use]
    pub fn summary(&self) -> BinderSummary {
        BinderSummary::from_entries(&self.entries)
    }

    /// Apply `patch` locally ahead of the store write.
    ///
    /// A printing key updates that printing. A name-level key updates every
    /// printing of the name that has no exact status of its own.
    pub fn apply(&mut self, key: &CardKey, patch: &StatusPatch) -> OptimisticUpdate {
        OptimisticUpdate {
            changes: self.assign(key, |flags| patch.apply_to(flags)),
        }
    }

    /// Adopt the flags the store reported after a successful write.
    pub fn confirm(&mut self, stored: &CollectionStatus) {
        let flags = stored.flags;
        self.assign(&stored.key, |_| flags);
    }

    /// Undo an optimistic update.
    ///
    /// Entries changed again since the update keep their newer state.
    pub fn rollback(&mut self, update: &OptimisticUpdate) {
        for change in &update.changes {
            let Some(entry) = self.entries.get_mut(change.index) else {
                continue;
            };
            let current = EntryState {
                flags: entry.flags,
                source: entry.source,
            };
            if current == change.after {
                entry.flags = change.before.flags;
                entry.source = change.before.source;
            }
        }
    }

    fn assign(
        &mut self,
        key: &CardKey,
        next: impl Fn(StatusFlags) -> StatusFlags,
    ) -> Vec<EntryChange> {
        let scheme = key.scheme();
        let target_source = match scheme {
            KeyScheme::Printing => StatusSource::Exact,
            KeyScheme::Name => StatusSource::Name,
        };
        let mut changes = Vec::new();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let targeted = match scheme {
                KeyScheme::Printing => entry.key() == key,
                KeyScheme::Name => {
                    entry.reference.name() == key.name() && entry.source != StatusSource::Exact
                }
            };
            if !targeted {
                continue;
            }
            let before = EntryState {
                flags: entry.flags,
                source: entry.source,
            };
            entry.flags = next(entry.flags);
            entry.source = target_source;
            changes.push(EntryChange {
                index,
                before,
                after: EntryState {
                    flags: entry.flags,
                    source: entry.source,
                },
            });
        }
        changes
    }
}
