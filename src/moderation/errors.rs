//! Moderation errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

use thiserror::Error;

use crate::{promote::PromoteError, staging::ProductId, staging::StagingStoreError};

/// Why a staged record was no longer in the state the moderator saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The record's version moved on (store `Conflict`).
    Conflict,

    /// The record no longer exists (store `NotFound`).
    Gone,
}

impl Display for StaleReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Conflict => "modified concurrently",
            Self::Gone => "no longer exists",
        })
    }
}

/// Moderation Errors
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Another moderation action got to the record first. Nothing was changed.
    #[error("description for product {key} was already processed ({reason})")]
    AlreadyProcessed {
        /// Product the record describes
        key: ProductId,

        /// Store outcome that revealed the race
        reason: StaleReason,
    },

    /// The live product was updated but the staging record could not be
    /// removed and needs cleaning up outside this workflow.
    #[error(
        "product {key} was updated but its staged description could not be removed ({reason})"
    )]
    Orphaned {
        /// Product the record describes
        key: ProductId,

        /// Store outcome of the failed delete
        reason: StaleReason,
    },

    /// The promote call failed; the record is still pending.
    #[error("failed to update product {key}: {source}")]
    Promote {
        /// Product the record describes
        key: ProductId,

        /// Promote failure
        #[source]
        source: PromoteError,
    },

    /// The staging store could not be reached.
    #[error("staging store call failed for product {key}: {source}")]
    Store {
        /// Product the record describes
        key: ProductId,

        /// Store failure
        #[source]
        source: StagingStoreError,
    },
}

impl ModerationError {
    /// Product the failed action targeted.
    #[must_use]
    pub fn key(&self) -> &ProductId {
        match self {
            Self::AlreadyProcessed { key, .. }
            | Self::Orphaned { key, .. }
            | Self::Promote { key, .. }
            | Self::Store { key, .. } => key,
        }
    }

    /// Store outcome behind a race, if the failure was one.
    #[must_use]
    pub fn stale_reason(&self) -> Option<StaleReason> {
        match self {
            Self::AlreadyProcessed { reason, .. } | Self::Orphaned { reason, .. } => Some(*reason),
            Self::Promote { .. } | Self::Store { .. } => None,
        }
    }

    pub(crate) fn from_store(key: &ProductId, source: StagingStoreError) -> Self {
        match source {
            StagingStoreError::Conflict => Self::AlreadyProcessed {
                key: key.clone(),
                reason: StaleReason::Conflict,
            },
            StagingStoreError::NotFound => Self::AlreadyProcessed {
                key: key.clone(),
                reason: StaleReason::Gone,
            },
            source => Self::Store {
                key: key.clone(),
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_races_become_already_processed() {
        let key = ProductId::from("p1");

        let conflict = ModerationError::from_store(&key, StagingStoreError::Conflict);
        let gone = ModerationError::from_store(&key, StagingStoreError::NotFound);

        assert_eq!(conflict.stale_reason(), Some(StaleReason::Conflict));
        assert_eq!(gone.stale_reason(), Some(StaleReason::Gone));
        assert!(
            matches!(conflict, ModerationError::AlreadyProcessed { .. }),
            "expected AlreadyProcessed, got {conflict:?}"
        );
    }

    #[test]
    fn other_store_failures_keep_their_message() {
        let error = ModerationError::from_store(
            &ProductId::from("p1"),
            StagingStoreError::EmptyProductId,
        );

        assert_eq!(error.stale_reason(), None);
        assert_eq!(error.key().as_str(), "p1");
        assert!(
            error.to_string().ends_with("product id must not be empty"),
            "unexpected message: {error}"
        );
    }

    #[test]
    fn orphan_message_is_distinct_from_promote_failure() {
        let orphan = ModerationError::Orphaned {
            key: ProductId::from("p1"),
            reason: StaleReason::Gone,
        };

        assert_eq!(
            orphan.to_string(),
            "product p1 was updated but its staged description could not be removed (no longer exists)"
        );
    }
}
