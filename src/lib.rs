//! Pixelphraser
//!
//! Moderation of machine-generated product descriptions. Drafts are staged as
//! custom objects in the `temporaryDescription` container, one per product,
//! until a moderator accepts them (the text goes live on the product) or
//! rejects them (the draft is discarded).

pub mod fixtures;
pub mod locales;
pub mod moderation;
pub mod platform;
pub mod prelude;
pub mod promote;
pub mod queue;
pub mod staging;
