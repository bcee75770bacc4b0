//! Staging Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    locales::LocalizedDescriptions,
    platform::CustomObject,
    staging::{StagingStoreError, TEMPORARY_DESCRIPTION_CONTAINER},
};

/// Product identifier. Doubles as the staging record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a raw product identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Store-assigned staging record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw record identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Optimistic concurrency token of a staging record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordVersion(u64);

impl RecordVersion {
    /// Wrap a raw version.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Raw version.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for RecordVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Payload of a staging record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingValue {
    /// Product image, copied at creation.
    pub image_url: String,

    /// Product name, copied at creation.
    pub product_name: String,

    /// Product type, copied at creation.
    pub product_type: String,

    /// Draft text per locale.
    #[serde(flatten)]
    pub descriptions: LocalizedDescriptions,
}

/// A description draft awaiting moderation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingRecord {
    /// Store-assigned identifier, stable for the record's lifetime.
    pub id: RecordId,

    /// Product the draft describes.
    pub key: ProductId,

    /// Version read from the store; required to delete the record.
    pub version: RecordVersion,

    /// Product context and draft text.
    pub value: StagingValue,

    /// When the store created the record.
    pub generated_at: Timestamp,
}

impl TryFrom<CustomObject> for StagingRecord {
    type Error = StagingStoreError;

    fn try_from(object: CustomObject) -> Result<Self, Self::Error> {
        let key = ProductId::from(object.key);

        if object.container != TEMPORARY_DESCRIPTION_CONTAINER {
            return Err(StagingStoreError::WrongContainer {
                key,
                container: object.container,
            });
        }

        let value = serde_json::from_value(object.value)
            .map_err(|source| StagingStoreError::Malformed {
                key: key.clone(),
                source,
            })?;

        Ok(Self {
            id: RecordId::new(object.id),
            key,
            version: RecordVersion::new(object.version),
            value,
            generated_at: object.created_at,
        })
    }
}

/// New Staging Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStagingRecord {
    /// Product to stage a draft for; must not be empty.
    pub product_id: ProductId,

    /// Product image.
    pub image_url: String,

    /// Product name.
    pub product_name: String,

    /// Product type.
    pub product_type: String,
}

impl NewStagingRecord {
    /// Initial payload: product context with every locale unset.
    #[must_use]
    pub fn initial_value(&self) -> StagingValue {
        StagingValue {
            image_url: self.image_url.clone(),
            product_name: self.product_name.clone(),
            product_type: self.product_type.clone(),
            descriptions: LocalizedDescriptions::default(),
        }
    }
}
