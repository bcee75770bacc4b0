//! Pixelphraser prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    fixtures::{DescriptionsFixture, FixtureError},
    locales::{LiveDescriptions, Locale, LocalizedDescriptions},
    moderation::{
        ModerationAction, ModerationError, ModerationOutcome, ModerationWorkflow, StaleReason,
    },
    platform::{CustomObject, CustomObjectDraft, CustomObjects, InMemoryCustomObjects, PlatformError},
    promote::{InMemoryPromoter, ProductPromoter, PromoteError},
    queue::{ModerationQueue, QueueError},
    staging::{
        NewStagingRecord, PlatformStagingStore, ProductId, RecordId, RecordVersion,
        StagingRecord, StagingStore, StagingStoreError, StagingValue,
        TEMPORARY_DESCRIPTION_CONTAINER,
    },
};
