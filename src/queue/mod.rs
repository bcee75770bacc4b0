//! Moderation Queue
//!
//! The moderator's view of pending drafts: a snapshot reloaded after every
//! action, a single in-flight marker, the most recent error and a transient
//! success notice.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::{
    moderation::{
        ModerationAction, ModerationError, ModerationOutcome, ModerationWorkflow, StaleReason,
    },
    staging::{ProductId, RecordId, StagingRecord},
};

mod errors;
mod render;

pub use errors::QueueError;
pub use render::{expanded_text, format_generated_at};

const ACCEPTED_NOTICE: &str = "Description accepted and updated successfully";
const REJECTED_NOTICE: &str = "Description rejected and removed successfully";
const ALREADY_REMOVED_NOTICE: &str = "Description was already removed";

#[derive(Debug, Default)]
struct QueueState {
    records: Vec<StagingRecord>,
    processing: Option<RecordId>,
    error: Option<String>,
    notice: Option<String>,
}

/// Pending drafts as shown to a moderator.
#[derive(Debug)]
pub struct ModerationQueue {
    workflow: ModerationWorkflow,
    state: Mutex<QueueState>,
}

/// Clears the processing marker when the action resolves, however it ends.
struct Processing<'a> {
    state: &'a Mutex<QueueState>,
}

impl Drop for Processing<'_> {
    fn drop(&mut self) {
        lock(self.state).processing = None;
    }
}

fn lock(state: &Mutex<QueueState>) -> MutexGuard<'_, QueueState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ModerationQueue {
    /// Create an empty queue; call [`ModerationQueue::load`] to populate it.
    #[must_use]
    pub fn new(workflow: ModerationWorkflow) -> Self {
        Self {
            workflow,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Replace the snapshot with the store's current pending records.
    ///
    /// Returns the number of pending records.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Load`] when the store cannot be read; the error
    /// message is also recorded for display and the previous snapshot kept.
    pub async fn load(&self) -> Result<usize, QueueError> {
        match self.workflow.store().list().await {
            Ok(records) => {
                let count = records.len();

                self.lock().records = records;

                Ok(count)
            }
            Err(source) => {
                self.lock().error = Some(format!("Error loading descriptions: {source}"));

                Err(QueueError::Load(source))
            }
        }
    }

    /// Accept a record from the current snapshot.
    ///
    /// # Errors
    ///
    /// [`QueueError::Busy`] while another action is in flight,
    /// [`QueueError::UnknownRecord`] for records outside the snapshot and
    /// [`QueueError::Moderation`] when the workflow fails.
    pub async fn accept(&self, id: &RecordId) -> Result<ModerationOutcome, QueueError> {
        self.run(ModerationAction::Accept, id).await
    }

    /// Reject a record from the current snapshot.
    ///
    /// A record that vanished before the delete counts as rejected.
    ///
    /// # Errors
    ///
    /// Same as [`ModerationQueue::accept`].
    pub async fn reject(&self, id: &RecordId) -> Result<ModerationOutcome, QueueError> {
        self.run(ModerationAction::Reject, id).await
    }

    /// Records in the current snapshot, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<StagingRecord> {
        self.lock().records.clone()
    }

    /// The snapshot's record for a product.
    #[must_use]
    pub fn find(&self, product: &ProductId) -> Option<StagingRecord> {
        self.lock()
            .records
            .iter()
            .find(|record| &record.key == product)
            .cloned()
    }

    /// Record whose action is in flight.
    #[must_use]
    pub fn processing(&self) -> Option<RecordId> {
        self.lock().processing.clone()
    }

    /// `true` while the row's controls should be disabled.
    #[must_use]
    pub fn is_processing(&self, id: &RecordId) -> bool {
        self.lock().processing.as_ref() == Some(id)
    }

    /// Most recent failure message.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Hide the current failure message.
    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    /// Current success notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    /// Take the success notice, clearing it.
    pub fn take_notice(&self) -> Option<String> {
        self.lock().notice.take()
    }

    /// Full multi-locale text of a record, as shown when its row is expanded.
    #[must_use]
    pub fn expanded(&self, id: &RecordId) -> Option<String> {
        self.with_record(id, expanded_text)
    }

    /// Image a row's thumbnail links to.
    #[must_use]
    pub fn image_url(&self, id: &RecordId) -> Option<String> {
        self.with_record(id, |record| record.value.image_url.clone())
    }

    fn with_record<T>(&self, id: &RecordId, f: impl FnOnce(&StagingRecord) -> T) -> Option<T> {
        self.lock().records.iter().find(|record| &record.id == id).map(f)
    }

    async fn run(
        &self,
        action: ModerationAction,
        id: &RecordId,
    ) -> Result<ModerationOutcome, QueueError> {
        let (record, _processing) = self.begin(id)?;

        match self.workflow.apply(action, &record).await {
            Ok(outcome) => {
                self.succeed(match outcome {
                    ModerationOutcome::Accepted => ACCEPTED_NOTICE,
                    ModerationOutcome::Rejected => REJECTED_NOTICE,
                });
                self.refresh().await;

                Ok(outcome)
            }
            Err(ModerationError::AlreadyProcessed {
                reason: StaleReason::Gone,
                ..
            }) if action == ModerationAction::Reject => {
                self.succeed(ALREADY_REMOVED_NOTICE);
                self.refresh().await;

                Ok(ModerationOutcome::Rejected)
            }
            Err(error) => {
                {
                    let mut state = self.lock();

                    state.notice = None;
                    state.error = Some(format!("Error {} description: {error}", action.progressive()));
                }

                // Raced records are stale in the snapshot.
                if error.stale_reason().is_some() {
                    self.refresh().await;
                }

                Err(QueueError::Moderation(error))
            }
        }
    }

    fn begin(&self, id: &RecordId) -> Result<(StagingRecord, Processing<'_>), QueueError> {
        let mut state = self.lock();

        if let Some(active) = &state.processing {
            return Err(QueueError::Busy(active.clone()));
        }

        let record = state
            .records
            .iter()
            .find(|record| &record.id == id)
            .cloned()
            .ok_or_else(|| QueueError::UnknownRecord(id.clone()))?;

        state.processing = Some(id.clone());

        Ok((record, Processing { state: &self.state }))
    }

    fn succeed(&self, notice: &str) {
        let mut state = self.lock();

        state.error = None;
        state.notice = Some(notice.to_string());
    }

    async fn refresh(&self) {
        if let Err(error) = self.load().await {
            warn!(error = %error, "failed to refresh moderation queue");
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        lock(&self.state)
    }
}
