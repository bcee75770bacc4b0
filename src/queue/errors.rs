//! Queue errors.

use std::io;

use thiserror::Error;

use crate::{moderation::ModerationError, staging::RecordId, staging::StagingStoreError};

/// Moderation Queue Errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// Another row is mid-action; controls stay disabled until it resolves.
    #[error("description {0} is still being processed")]
    Busy(RecordId),

    /// The record is not part of the loaded snapshot.
    #[error("description {0} is not in the queue")]
    UnknownRecord(RecordId),

    /// Pending records could not be fetched.
    #[error("failed to load descriptions: {0}")]
    Load(#[source] StagingStoreError),

    /// The moderation action failed.
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    /// Writing the rendered queue failed.
    #[error("failed to write queue: {0}")]
    Io(#[from] io::Error),
}
