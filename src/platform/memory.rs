//! In-memory platform

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::platform::{CustomObject, CustomObjectDraft, CustomObjects, PlatformError};

/// Custom objects held in process memory.
///
/// Mirrors the platform's guarantees: keys are unique per container, versions
/// start at 1 and grow by one on every write, and writes must name the current
/// version.
#[derive(Debug, Default)]
pub struct InMemoryCustomObjects {
    objects: Mutex<FxHashMap<(String, String), CustomObject>>,
}

impl InMemoryCustomObjects {
    /// Create an empty platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects across all containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when no objects are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashMap<(String, String), CustomObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CustomObjects for InMemoryCustomObjects {
    async fn create(&self, draft: CustomObjectDraft) -> Result<CustomObject, PlatformError> {
        let mut objects = self.lock();
        let slot = (draft.container.clone(), draft.key.clone());

        if objects.contains_key(&slot) {
            return Err(PlatformError::DuplicateKey {
                container: draft.container,
                key: draft.key,
            });
        }

        let now = Timestamp::now();
        let object = CustomObject {
            id: Uuid::now_v7().to_string(),
            container: draft.container,
            key: draft.key,
            version: 1,
            value: draft.value,
            created_at: now,
            last_modified_at: now,
        };

        objects.insert(slot, object.clone());

        Ok(object)
    }

    async fn list(&self, container: &str) -> Result<Vec<CustomObject>, PlatformError> {
        let mut listed: Vec<CustomObject> = self
            .lock()
            .values()
            .filter(|object| object.container == container)
            .cloned()
            .collect();

        // v7 ids sort by creation time, which breaks timestamp ties.
        listed.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));

        Ok(listed)
    }

    async fn get(&self, container: &str, key: &str) -> Result<Option<CustomObject>, PlatformError> {
        Ok(self
            .lock()
            .get(&(container.to_string(), key.to_string()))
            .cloned())
    }

    async fn update(
        &self,
        draft: CustomObjectDraft,
        version: u64,
    ) -> Result<CustomObject, PlatformError> {
        let mut objects = self.lock();

        let object = objects
            .get_mut(&(draft.container, draft.key))
            .ok_or(PlatformError::NotFound)?;

        if object.version != version {
            return Err(PlatformError::Conflict {
                current_version: Some(object.version),
            });
        }

        object.value = draft.value;
        object.version += 1;
        object.last_modified_at = Timestamp::now();

        Ok(object.clone())
    }

    async fn delete(&self, id: &str, version: u64) -> Result<(), PlatformError> {
        let mut objects = self.lock();

        let (slot, current_version) = objects
            .iter()
            .find(|(_, object)| object.id == id)
            .map(|(slot, object)| (slot.clone(), object.version))
            .ok_or(PlatformError::NotFound)?;

        if current_version != version {
            return Err(PlatformError::Conflict {
                current_version: Some(current_version),
            });
        }

        objects.remove(&slot);

        Ok(())
    }
}
