//! Moderation
//!
//! Accepting and rejecting staged drafts. A pending record moves to exactly
//! one terminal state and is deleted on the way:
//!
//! ```text
//! Pending ──accept──▶ Accepted   (promote, then delete)
//!    └─────reject──▶ Rejected    (delete)
//! ```

mod errors;
mod workflow;

pub use errors::{ModerationError, StaleReason};
pub use workflow::*;
