//! Commercetools HTTP API client.
//!
//! Backs the staging store with the project's custom objects and promotes
//! accepted descriptions onto products.

mod auth;
mod client;
mod custom_objects;
mod errors;
mod products;

#[cfg(test)]
mod test_helpers;

pub use client::{CommercetoolsClient, CommercetoolsConfig};
pub use errors::CommercetoolsError;
pub use products::CommercetoolsPromoter;
