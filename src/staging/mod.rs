//! Staging
//!
//! Description drafts waiting for a moderator, stored one per product in the
//! platform's `temporaryDescription` container.

mod errors;
mod records;
mod store;

pub use errors::StagingStoreError;
pub use records::*;
pub use store::*;

/// Container holding staging records, separate from other record kinds.
pub const TEMPORARY_DESCRIPTION_CONTAINER: &str = "temporaryDescription";
