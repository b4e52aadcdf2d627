//! Client-side binder state with optimistic status toggles.
//!
//! A toggle updates the local view before the write is acknowledged. When
//! the write succeeds the stored flags replace the guess; when it fails the
//! guess is rolled back, unless another toggle has touched the entry since.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::domain::ports::{CollectionCommand, UpsertStatusRequest};
use crate::domain::{
    BinderEntry, BinderSummary, BinderView, CardKey, CardReference, CollectionStatus, Error,
    StatusMap, StatusPatch,
};

/// Reconciled binder held by a client, writing through a [`CollectionCommand`].
pub struct BinderSession<C> {
    command: Arc<C>,
    view: Mutex<BinderView>,
}

impl<C> BinderSession<C>
where
    C: CollectionCommand,
{
    /// Reconcile `catalogue` with `statuses` and write through `command`.
    pub fn new(command: Arc<C>, catalogue: &[CardReference], statuses: &StatusMap) -> Self {
        Self {
            command,
            view: Mutex::new(BinderView::reconcile(catalogue, statuses)),
        }
    }

    fn view(&self) -> MutexGuard<'_, BinderView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the current entries.
    pub fn entries(&self) -> Vec<BinderEntry> {
        self.view().entries().to_vec()
    }

    /// Counts over the current entries.
    pub fn summary(&self) -> BinderSummary {
        self.view().summary()
    }

    /// Apply `patch` to `key` locally, then persist it.
    ///
    /// # Errors
    ///
    /// Returns the write error after rolling the local change back. Failed
    /// writes are not retried.
    pub async fn toggle(&self, key: CardKey, patch: StatusPatch) -> Result<CollectionStatus, Error> {
        let update = self.view().apply(&key, &patch);
        let request = UpsertStatusRequest {
            key: key.clone(),
            patch,
        };
        match self.command.upsert_status(request).await {
            Ok(stored) => {
                self.view().confirm(&stored);
                Ok(stored)
            }
            Err(error) => {
                warn!(
                    key = %key,
                    entries = update.len(),
                    error = %error,
                    "status write failed; rolling back local change"
                );
                self.view().rollback(&update);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCollectionCommand;
    use crate::domain::{StatusFlags, StatusSource};
    use async_trait::async_trait;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use tokio::sync::Notify;

    #[fixture]
    fn catalogue() -> Vec<CardReference> {
        vec![
            CardReference::new("Ashe", Some("A-1")).expect("reference"),
            CardReference::new("Ashe", Some("A-2")).expect("reference"),
            CardReference::new("Vi", Some("V-1")).expect("reference"),
        ]
    }

    fn owned_patch() -> StatusPatch {
        StatusPatch {
            owned: Some(true),
            ..StatusPatch::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn successful_toggle_adopts_stored_flags(catalogue: Vec<CardReference>) {
        let mut command = MockCollectionCommand::new();
        command.expect_upsert_status().times(1).returning(|request| {
            Ok(CollectionStatus {
                key: request.key,
                flags: StatusFlags {
                    owned: true,
                    duplicate: true,
                    foil: false,
                },
                updated_at: Utc::now(),
            })
        });
        let session = BinderSession::new(Arc::new(command), &catalogue, &StatusMap::default());
        let key = CardKey::new("Ashe", Some("A-2")).expect("key");

        session.toggle(key, owned_patch()).await.expect("toggle");

        let entries = session.entries();
        assert!(!entries[0].flags.owned);
        assert!(entries[1].flags.owned && entries[1].flags.duplicate);
        assert_eq!(entries[1].source, StatusSource::Exact);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_toggle_is_rolled_back(catalogue: Vec<CardReference>) {
        let mut command = MockCollectionCommand::new();
        command
            .expect_upsert_status()
            .times(1)
            .returning(|_| Err(Error::service_unavailable("store down")));
        let session = BinderSession::new(Arc::new(command), &catalogue, &StatusMap::default());
        let key = CardKey::name_level("Ashe").expect("key");

        let error = session.toggle(key, owned_patch()).await.expect_err("write fails");

        assert_eq!(error.code(), crate::domain::ErrorCode::ServiceUnavailable);
        assert!(session.entries().iter().all(|entry| !entry.flags.owned));
        assert!(
            session
                .entries()
                .iter()
                .all(|entry| entry.source == StatusSource::Default)
        );
    }

    /// Holds every write until released, then fails it.
    struct GatedFailure {
        release: Notify,
        entered: Notify,
    }

    #[async_trait]
    impl CollectionCommand for GatedFailure {
        async fn upsert_status(
            &self,
            _request: UpsertStatusRequest,
        ) -> Result<CollectionStatus, Error> {
            self.entered.notify_one();
            self.release.notified().await;
            Err(Error::internal("write rejected"))
        }
    }

    #[rstest]
    #[tokio::test]
    async fn optimistic_state_is_visible_before_the_write_settles(catalogue: Vec<CardReference>) {
        let command = Arc::new(GatedFailure {
            release: Notify::new(),
            entered: Notify::new(),
        });
        let session = BinderSession::new(Arc::clone(&command), &catalogue, &StatusMap::default());
        let key = CardKey::new("Vi", Some("V-1")).expect("key");

        let observe = async {
            command.entered.notified().await;
            let mid_flight = session.entries();
            command.release.notify_one();
            mid_flight
        };
        let (result, mid_flight) = tokio::join!(session.toggle(key, owned_patch()), observe);

        assert!(mid_flight[2].flags.owned);
        assert!(result.is_err());
        assert!(!session.entries()[2].flags.owned);
    }
}
