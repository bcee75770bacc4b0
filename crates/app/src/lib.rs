//! Commercetools wiring and operator tooling for description moderation.

pub mod commercetools;
pub mod config;
pub mod context;
pub mod observability;
