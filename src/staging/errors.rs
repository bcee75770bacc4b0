//! Staging store errors.

use thiserror::Error;

use crate::{platform::PlatformError, staging::ProductId};

/// Staging Store Errors
#[derive(Debug, Error)]
pub enum StagingStoreError {
    /// Records must be keyed by a non-empty product id.
    #[error("product id must not be empty")]
    EmptyProductId,

    /// A pending record already exists for the product.
    #[error("a staged description already exists for product {0}")]
    DuplicateKey(ProductId),

    /// The supplied version is stale.
    #[error("staged description was modified concurrently")]
    Conflict,

    /// The record no longer exists.
    #[error("staged description not found")]
    NotFound,

    /// The stored payload could not be decoded.
    #[error("staged description for product {key} is malformed")]
    Malformed {
        /// Key of the undecodable record
        key: ProductId,

        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// The platform returned an object outside the staging container.
    #[error("object {key} belongs to container {container}, not the staging container")]
    WrongContainer {
        /// Key of the foreign object
        key: ProductId,

        /// Container it belongs to
        container: String,
    },

    /// Transport, authentication or other non-domain failure.
    #[error("external store call failed: {0}")]
    External(#[source] PlatformError),
}

impl From<PlatformError> for StagingStoreError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::DuplicateKey { key, .. } => Self::DuplicateKey(ProductId::from(key)),
            PlatformError::Conflict { .. } => Self::Conflict,
            PlatformError::NotFound => Self::NotFound,
            PlatformError::External(_) => Self::External(error),
        }
    }
}
