//! App Context

use std::{fmt, path::Path, sync::Arc};

use pixelphraser::{
    fixtures::{DescriptionsFixture, FixtureError},
    moderation::ModerationWorkflow,
    platform::InMemoryCustomObjects,
    promote::InMemoryPromoter,
    queue::ModerationQueue,
    staging::{PlatformStagingStore, StagingStore},
};
use thiserror::Error;
use tracing::info;

use crate::commercetools::{
    CommercetoolsClient, CommercetoolsConfig, CommercetoolsError, CommercetoolsPromoter,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("{0} must be set when no fixture is given")]
    MissingSetting(&'static str),

    #[error("failed to create commercetools client: {0}")]
    Commercetools(#[source] CommercetoolsError),

    #[error("failed to load fixture: {0}")]
    Fixture(#[source] FixtureError),
}

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn StagingStore>,
    pub workflow: ModerationWorkflow,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("workflow", &self.workflow)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context against a commercetools project.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be configured.
    pub fn from_commercetools(config: CommercetoolsConfig) -> Result<Self, AppInitError> {
        let client = Arc::new(CommercetoolsClient::new(config).map_err(AppInitError::Commercetools)?);
        let store: Arc<dyn StagingStore> = Arc::new(PlatformStagingStore::new(client.clone()));

        Ok(Self {
            workflow: ModerationWorkflow::new(
                store.clone(),
                Arc::new(CommercetoolsPromoter::new(client)),
            ),
            store,
        })
    }

    /// Build application context over an in-memory platform seeded from a
    /// fixture file. Promoted descriptions are kept in memory.
    ///
    /// # Errors
    ///
    /// Returns an error when the fixture cannot be read or seeded.
    pub async fn from_fixture(path: &Path) -> Result<Self, AppInitError> {
        let fixture = DescriptionsFixture::load(path).map_err(AppInitError::Fixture)?;
        let store = Arc::new(PlatformStagingStore::new(Arc::new(InMemoryCustomObjects::new())));

        let seeded = fixture
            .seed(store.as_ref())
            .await
            .map_err(AppInitError::Fixture)?;

        info!(count = seeded.len(), path = %path.display(), "seeded descriptions from fixture");

        Ok(Self {
            workflow: ModerationWorkflow::new(store.clone(), Arc::new(InMemoryPromoter::new())),
            store,
        })
    }

    /// A fresh, unloaded moderation queue.
    #[must_use]
    pub fn queue(&self) -> ModerationQueue {
        ModerationQueue::new(self.workflow.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn fixture_context_loads_seeded_queue() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        writeln!(
            file,
            "descriptions:\n  - product_id: p1\n    image_url: img.png\n    product_name: Widget\n    product_type: toy\n    us: A great widget"
        )?;

        let context = AppContext::from_fixture(file.path()).await?;
        let queue = context.queue();

        assert_eq!(queue.load().await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_fixture_is_init_error() {
        let result = AppContext::from_fixture(Path::new("/nonexistent/fixture.yml")).await;

        assert!(
            matches!(result, Err(AppInitError::Fixture(FixtureError::Io(_)))),
            "expected fixture error, got {result:?}"
        );
    }
}
