//! Staging store.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, error, info, warn};

use crate::{
    locales::LocalizedDescriptions,
    platform::{CustomObjectDraft, CustomObjects},
    staging::{
        NewStagingRecord, ProductId, RecordId, RecordVersion, StagingRecord, StagingStoreError,
        StagingValue, TEMPORARY_DESCRIPTION_CONTAINER,
    },
};

/// Staging store backed by the platform's custom objects.
#[derive(Clone)]
pub struct PlatformStagingStore {
    objects: Arc<dyn CustomObjects>,
}

impl PlatformStagingStore {
    /// Create a store over the given platform objects.
    #[must_use]
    pub fn new(objects: Arc<dyn CustomObjects>) -> Self {
        Self { objects }
    }

    fn draft(key: &ProductId, value: &StagingValue) -> Result<CustomObjectDraft, StagingStoreError> {
        let value = serde_json::to_value(value).map_err(|source| StagingStoreError::Malformed {
            key: key.clone(),
            source,
        })?;

        Ok(CustomObjectDraft {
            container: TEMPORARY_DESCRIPTION_CONTAINER.to_string(),
            key: key.as_str().to_string(),
            value,
        })
    }
}

impl Debug for PlatformStagingStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PlatformStagingStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl StagingStore for PlatformStagingStore {
    async fn create(&self, record: NewStagingRecord) -> Result<StagingRecord, StagingStoreError> {
        if record.product_id.as_str().trim().is_empty() {
            return Err(StagingStoreError::EmptyProductId);
        }

        let product_id = record.product_id.clone();

        info!(%product_id, "creating staged description");

        let draft = Self::draft(&product_id, &record.initial_value())?;

        let created = self.objects.create(draft).await.map_err(|source| {
            error!(%product_id, error = %source, "failed to create staged description");

            StagingStoreError::from(source)
        })?;

        info!(%product_id, record_id = %created.id, "staged description created");

        StagingRecord::try_from(created)
    }

    async fn list(&self) -> Result<Vec<StagingRecord>, StagingStoreError> {
        let objects = self.objects.list(TEMPORARY_DESCRIPTION_CONTAINER).await?;
        let mut records = Vec::with_capacity(objects.len());

        for object in objects {
            match StagingRecord::try_from(object) {
                Ok(record) => records.push(record),
                Err(StagingStoreError::Malformed { key, source }) => {
                    warn!(product_id = %key, error = %source, "skipping malformed staged description");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(records)
    }

    async fn get(&self, product: &ProductId) -> Result<Option<StagingRecord>, StagingStoreError> {
        self.objects
            .get(TEMPORARY_DESCRIPTION_CONTAINER, product.as_str())
            .await?
            .map(StagingRecord::try_from)
            .transpose()
    }

    async fn update_descriptions(
        &self,
        record: &StagingRecord,
        descriptions: LocalizedDescriptions,
    ) -> Result<StagingRecord, StagingStoreError> {
        let value = StagingValue {
            descriptions,
            ..record.value.clone()
        };

        let draft = Self::draft(&record.key, &value)?;

        let updated = self
            .objects
            .update(draft, record.version.get())
            .await
            .map_err(|source| {
                error!(product_id = %record.key, error = %source, "failed to update staged description");

                StagingStoreError::from(source)
            })?;

        StagingRecord::try_from(updated)
    }

    async fn delete(&self, id: &RecordId, version: RecordVersion) -> Result<(), StagingStoreError> {
        self.objects.delete(id.as_str(), version.get()).await?;

        debug!(record_id = %id, %version, "staged description deleted");

        Ok(())
    }
}

/// Pending description drafts, one per product.
#[automock]
#[async_trait]
pub trait StagingStore: Send + Sync {
    /// Stages an empty draft for a product. Fails with
    /// [`StagingStoreError::DuplicateKey`] while one is already pending.
    async fn create(&self, record: NewStagingRecord) -> Result<StagingRecord, StagingStoreError>;

    /// Every pending record, oldest first. Records whose payload cannot be
    /// decoded are skipped.
    async fn list(&self) -> Result<Vec<StagingRecord>, StagingStoreError>;

    /// The pending record for a product, if any.
    async fn get(&self, product: &ProductId) -> Result<Option<StagingRecord>, StagingStoreError>;

    /// Replaces the draft text of a record read at `record.version`.
    async fn update_descriptions(
        &self,
        record: &StagingRecord,
        descriptions: LocalizedDescriptions,
    ) -> Result<StagingRecord, StagingStoreError>;

    /// Deletes a record, provided `version` is still current.
    async fn delete(&self, id: &RecordId, version: RecordVersion) -> Result<(), StagingStoreError>;
}
