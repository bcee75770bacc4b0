//! Moderation workflow.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{error, info, warn};

use crate::{
    moderation::{ModerationError, StaleReason},
    promote::ProductPromoter,
    staging::{StagingRecord, StagingStore, StagingStoreError},
};

/// Action a moderator takes on a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    /// Promote the draft to the live product, then drop it.
    Accept,

    /// Drop the draft.
    Reject,
}

impl ModerationAction {
    /// Verb used in moderator-facing messages, e.g. "accepting".
    #[must_use]
    pub const fn progressive(self) -> &'static str {
        match self {
            Self::Accept => "accepting",
            Self::Reject => "rejecting",
        }
    }
}

/// Terminal state a record reached. The record no longer exists in either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// Draft applied to the live product and removed.
    Accepted,

    /// Draft removed.
    Rejected,
}

/// Orchestrates accept and reject against the staging store and promoter.
#[derive(Clone)]
pub struct ModerationWorkflow {
    store: Arc<dyn StagingStore>,
    promoter: Arc<dyn ProductPromoter>,
}

impl ModerationWorkflow {
    /// Create a workflow over a staging store and promoter.
    #[must_use]
    pub fn new(store: Arc<dyn StagingStore>, promoter: Arc<dyn ProductPromoter>) -> Self {
        Self { store, promoter }
    }

    /// The staging store records are read from and deleted in.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn StagingStore> {
        &self.store
    }

    /// Run `action` against `record`.
    ///
    /// # Errors
    ///
    /// See [`ModerationWorkflow::accept`] and [`ModerationWorkflow::reject`].
    pub async fn apply(
        &self,
        action: ModerationAction,
        record: &StagingRecord,
    ) -> Result<ModerationOutcome, ModerationError> {
        match action {
            ModerationAction::Accept => self.accept(record).await,
            ModerationAction::Reject => self.reject(record).await,
        }
    }

    /// Promote the record's drafts to the live product, then delete the record.
    ///
    /// Unset locales are promoted as empty strings. The promote call always
    /// resolves before the delete is attempted.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::AlreadyProcessed`] when the record changed or
    ///   vanished since it was read; nothing is promoted.
    /// - [`ModerationError::Promote`] when promotion fails; the record stays
    ///   pending.
    /// - [`ModerationError::Orphaned`] when promotion succeeded but the delete
    ///   hit a conflict or a missing record.
    /// - [`ModerationError::Store`] on store transport failures.
    pub async fn accept(&self, record: &StagingRecord) -> Result<ModerationOutcome, ModerationError> {
        info!(product_id = %record.key, record_id = %record.id, "accepting description");

        self.ensure_pending(record).await?;

        let live = record.value.descriptions.to_live();

        self.promoter
            .promote(&record.key, &live)
            .await
            .map_err(|source| {
                error!(product_id = %record.key, error = %source, "failed to promote description");

                ModerationError::Promote {
                    key: record.key.clone(),
                    source,
                }
            })?;

        match self.store.delete(&record.id, record.version).await {
            Ok(()) => {
                info!(product_id = %record.key, "description accepted");

                Ok(ModerationOutcome::Accepted)
            }
            Err(StagingStoreError::Conflict) => Err(Self::orphaned(record, StaleReason::Conflict)),
            Err(StagingStoreError::NotFound) => Err(Self::orphaned(record, StaleReason::Gone)),
            Err(source) => {
                error!(
                    product_id = %record.key,
                    error = %source,
                    "description promoted but staged record could not be deleted"
                );

                Err(ModerationError::Store {
                    key: record.key.clone(),
                    source,
                })
            }
        }
    }

    /// Delete the record without touching the live product.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::AlreadyProcessed`] when the record changed
    ///   ([`StaleReason::Conflict`]) or is already gone ([`StaleReason::Gone`]).
    ///   A gone record already is in the state a reject asks for.
    /// - [`ModerationError::Store`] on store transport failures.
    pub async fn reject(&self, record: &StagingRecord) -> Result<ModerationOutcome, ModerationError> {
        info!(product_id = %record.key, record_id = %record.id, "rejecting description");

        self.store
            .delete(&record.id, record.version)
            .await
            .map_err(|source| {
                warn!(product_id = %record.key, error = %source, "failed to reject description");

                ModerationError::from_store(&record.key, source)
            })?;

        info!(product_id = %record.key, "description rejected");

        Ok(ModerationOutcome::Rejected)
    }

    async fn ensure_pending(&self, record: &StagingRecord) -> Result<(), ModerationError> {
        let current = self
            .store
            .get(&record.key)
            .await
            .map_err(|source| ModerationError::from_store(&record.key, source))?;

        match current {
            Some(current) if current.id == record.id && current.version == record.version => Ok(()),
            Some(_) => Err(ModerationError::AlreadyProcessed {
                key: record.key.clone(),
                reason: StaleReason::Conflict,
            }),
            None => Err(ModerationError::AlreadyProcessed {
                key: record.key.clone(),
                reason: StaleReason::Gone,
            }),
        }
    }

    fn orphaned(record: &StagingRecord, reason: StaleReason) -> ModerationError {
        error!(
            product_id = %record.key,
            record_id = %record.id,
            %reason,
            "live product updated but staged description is orphaned"
        );

        ModerationError::Orphaned {
            key: record.key.clone(),
            reason,
        }
    }
}

impl Debug for ModerationWorkflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ModerationWorkflow").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use jiff::Timestamp;
    use mockall::Sequence;
    use testresult::TestResult;

    use crate::{
        locales::{LiveDescriptions, Locale, LocalizedDescriptions},
        platform::PlatformError,
        promote::{MockProductPromoter, PromoteError},
        staging::{MockStagingStore, ProductId, RecordId, RecordVersion, StagingValue},
    };

    use super::*;

    fn record(version: u64) -> StagingRecord {
        StagingRecord {
            id: RecordId::from("rec-1"),
            key: ProductId::from("p2"),
            version: RecordVersion::new(version),
            value: StagingValue {
                image_url: "img.png".to_string(),
                product_name: "Widget".to_string(),
                product_type: "toy".to_string(),
                descriptions: LocalizedDescriptions::default().with(Locale::EnUs, "A great widget"),
            },
            generated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn workflow(store: MockStagingStore, promoter: MockProductPromoter) -> ModerationWorkflow {
        ModerationWorkflow::new(Arc::new(store), Arc::new(promoter))
    }

    fn store_with_current(current: Option<StagingRecord>) -> MockStagingStore {
        let mut store = MockStagingStore::new();

        store
            .expect_get()
            .once()
            .withf(|product| product.as_str() == "p2")
            .return_once(move |_| Ok(current));

        store
    }

    #[tokio::test]
    async fn accept_promotes_before_deleting() -> TestResult {
        let mut seq = Sequence::new();
        let mut store = MockStagingStore::new();
        let mut promoter = MockProductPromoter::new();

        store
            .expect_get()
            .once()
            .in_sequence(&mut seq)
            .return_once(|_| Ok(Some(record(3))));

        promoter
            .expect_promote()
            .once()
            .in_sequence(&mut seq)
            .withf(|product, live| {
                product.as_str() == "p2"
                    && *live
                        == LiveDescriptions {
                            en_us: "A great widget".to_string(),
                            en_gb: String::new(),
                            de_de: String::new(),
                        }
            })
            .return_once(|_, _| Ok(()));

        store
            .expect_delete()
            .once()
            .in_sequence(&mut seq)
            .withf(|id, version| id.as_str() == "rec-1" && *version == RecordVersion::new(3))
            .return_once(|_, _| Ok(()));

        let outcome = workflow(store, promoter).accept(&record(3)).await?;

        assert_eq!(outcome, ModerationOutcome::Accepted);

        Ok(())
    }

    #[tokio::test]
    async fn accept_keeps_record_when_promote_fails() {
        let mut store = store_with_current(Some(record(3)));
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().once().return_once(|_, _| {
            Err(PromoteError::External(Box::new(io::Error::other(
                "503 service unavailable",
            ))))
        });

        store.expect_delete().never();

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::Promote { ref source, .. }) if source.to_string().contains("503")
            ),
            "expected Promote, got {result:?}"
        );
    }

    #[tokio::test]
    async fn accept_reports_orphan_when_delete_conflicts() {
        let mut store = store_with_current(Some(record(3)));
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().once().return_once(|_, _| Ok(()));

        store
            .expect_delete()
            .once()
            .return_once(|_, _| Err(StagingStoreError::Conflict));

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::Orphaned {
                    reason: StaleReason::Conflict,
                    ..
                })
            ),
            "expected Orphaned, got {result:?}"
        );
    }

    #[tokio::test]
    async fn accept_reports_orphan_when_record_vanishes_after_promote() {
        let mut store = store_with_current(Some(record(3)));
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().once().return_once(|_, _| Ok(()));

        store
            .expect_delete()
            .once()
            .return_once(|_, _| Err(StagingStoreError::NotFound));

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::Orphaned {
                    reason: StaleReason::Gone,
                    ..
                })
            ),
            "expected Orphaned, got {result:?}"
        );
    }

    #[tokio::test]
    async fn accept_does_not_promote_a_record_that_changed() {
        let mut store = store_with_current(Some(record(4)));
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();
        store.expect_delete().never();

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::AlreadyProcessed {
                    reason: StaleReason::Conflict,
                    ..
                })
            ),
            "expected AlreadyProcessed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn accept_does_not_promote_a_record_that_is_gone() {
        let mut store = store_with_current(None);
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();
        store.expect_delete().never();

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::AlreadyProcessed {
                    reason: StaleReason::Gone,
                    ..
                })
            ),
            "expected AlreadyProcessed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn accept_surfaces_delete_transport_failure() {
        let mut store = store_with_current(Some(record(3)));
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().once().return_once(|_, _| Ok(()));

        store
            .expect_delete()
            .once()
            .return_once(|_, _| {
                Err(StagingStoreError::External(PlatformError::External(
                    Box::new(io::Error::other("connection reset")),
                )))
            });

        let result = workflow(store, promoter).accept(&record(3)).await;

        assert!(
            matches!(result, Err(ModerationError::Store { .. })),
            "expected Store, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reject_deletes_without_promoting() -> TestResult {
        let mut store = MockStagingStore::new();
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();
        store.expect_get().never();

        store
            .expect_delete()
            .once()
            .withf(|id, version| id.as_str() == "rec-1" && *version == RecordVersion::new(3))
            .return_once(|_, _| Ok(()));

        let outcome = workflow(store, promoter).reject(&record(3)).await?;

        assert_eq!(outcome, ModerationOutcome::Rejected);

        Ok(())
    }

    #[tokio::test]
    async fn reject_with_stale_version_is_already_processed() {
        let mut store = MockStagingStore::new();
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();

        store
            .expect_delete()
            .once()
            .return_once(|_, _| Err(StagingStoreError::Conflict));

        let result = workflow(store, promoter).reject(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::AlreadyProcessed {
                    reason: StaleReason::Conflict,
                    ..
                })
            ),
            "expected AlreadyProcessed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn reject_of_missing_record_reports_gone() {
        let mut store = MockStagingStore::new();
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();

        store
            .expect_delete()
            .once()
            .return_once(|_, _| Err(StagingStoreError::NotFound));

        let result = workflow(store, promoter).reject(&record(3)).await;

        assert!(
            matches!(
                result,
                Err(ModerationError::AlreadyProcessed {
                    reason: StaleReason::Gone,
                    ..
                })
            ),
            "expected AlreadyProcessed, got {result:?}"
        );
    }

    #[tokio::test]
    async fn apply_dispatches_on_action() -> TestResult {
        let mut store = MockStagingStore::new();
        let mut promoter = MockProductPromoter::new();

        promoter.expect_promote().never();
        store.expect_delete().once().return_once(|_, _| Ok(()));

        let outcome = workflow(store, promoter)
            .apply(ModerationAction::Reject, &record(1))
            .await?;

        assert_eq!(outcome, ModerationOutcome::Rejected);

        Ok(())
    }
}
