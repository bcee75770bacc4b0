//! Commerce Platform
//!
//! The slice of the commerce platform the moderation workflow relies on:
//! versioned JSON records ("custom objects") partitioned into containers and
//! keyed uniquely within each container.

use std::error::Error as StdError;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

mod memory;

pub use memory::InMemoryCustomObjects;

/// Custom object as stored by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomObject {
    /// Platform-assigned identifier.
    pub id: String,

    /// Namespace partition.
    pub container: String,

    /// Key, unique within the container.
    pub key: String,

    /// Optimistic concurrency token.
    pub version: u64,

    /// JSON payload.
    pub value: Value,

    /// When the platform created the object.
    pub created_at: Timestamp,

    /// When the platform last modified the object.
    pub last_modified_at: Timestamp,
}

/// Custom object contents sent to the platform on create or update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomObjectDraft {
    /// Namespace partition.
    pub container: String,

    /// Key, unique within the container.
    pub key: String,

    /// JSON payload.
    pub value: Value,
}

/// Errors reported by the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// An object with the same container and key already exists.
    #[error("object {key} already exists in container {container}")]
    DuplicateKey {
        /// Container of the existing object
        container: String,

        /// Key of the existing object
        key: String,
    },

    /// The supplied version does not match the stored version.
    #[error("object was modified concurrently")]
    Conflict {
        /// Version currently stored, when the platform reports it
        current_version: Option<u64>,
    },

    /// The object does not exist.
    #[error("object not found")]
    NotFound,

    /// Transport, authentication or any other non-domain failure.
    #[error("platform call failed: {0}")]
    External(#[source] Box<dyn StdError + Send + Sync>),
}

/// Custom object operations offered by the platform.
#[automock]
#[async_trait]
pub trait CustomObjects: Send + Sync {
    /// Create a new object. Fails with [`PlatformError::DuplicateKey`] when the
    /// container already holds the key.
    async fn create(&self, draft: CustomObjectDraft) -> Result<CustomObject, PlatformError>;

    /// List every object in a container, oldest first.
    async fn list(&self, container: &str) -> Result<Vec<CustomObject>, PlatformError>;

    /// Fetch a single object by container and key.
    async fn get(&self, container: &str, key: &str) -> Result<Option<CustomObject>, PlatformError>;

    /// Replace an object's value, provided `version` is still current.
    async fn update(
        &self,
        draft: CustomObjectDraft,
        version: u64,
    ) -> Result<CustomObject, PlatformError>;

    /// Delete an object by identifier, provided `version` is still current.
    async fn delete(&self, id: &str, version: u64) -> Result<(), PlatformError>;
}
