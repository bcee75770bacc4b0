//! Fixtures
//!
//! YAML description drafts used to seed a store for demos and tests:
//!
//! ```yaml
//! descriptions:
//!   - product_id: p1
//!     image_url: https://img.example/p1.png
//!     product_name: Widget
//!     product_type: toy
//!     us: A great widget
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    locales::{Locale, LocalizedDescriptions},
    staging::{NewStagingRecord, ProductId, StagingRecord, StagingStore, StagingStoreError},
};

/// Fixture Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Seeding the store failed
    #[error("Failed to seed description for product {product_id}: {source}")]
    Seed {
        /// Product being seeded
        product_id: ProductId,

        /// Store failure
        #[source]
        source: StagingStoreError,
    },
}

/// A set of description drafts.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionsFixture {
    /// Drafts, seeded in order.
    pub descriptions: Vec<DescriptionFixture>,
}

/// A single description draft.
#[derive(Debug, Clone, Deserialize)]
pub struct DescriptionFixture {
    /// Product identifier
    pub product_id: String,

    /// Product image
    pub image_url: String,

    /// Product name
    pub product_name: String,

    /// Product type
    pub product_type: String,

    /// `en-US` draft text
    #[serde(default)]
    pub us: Option<String>,

    /// `en-GB` draft text
    #[serde(default)]
    pub gb: Option<String>,

    /// `de-DE` draft text
    #[serde(default)]
    pub de: Option<String>,
}

impl DescriptionFixture {
    fn descriptions(&self) -> LocalizedDescriptions {
        let mut descriptions = LocalizedDescriptions::default();

        for (locale, text) in [
            (Locale::EnUs, &self.us),
            (Locale::EnGb, &self.gb),
            (Locale::DeDe, &self.de),
        ] {
            if let Some(text) = text {
                descriptions.set(locale, text.clone());
            }
        }

        descriptions
    }
}

impl DescriptionsFixture {
    /// Parse a fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] for invalid YAML or missing fields.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] when the file cannot be read and
    /// [`FixtureError::Yaml`] when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Stage every draft in `store`, filling in any locale text supplied.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Seed`] for the first draft the store refuses.
    pub async fn seed(&self, store: &dyn StagingStore) -> Result<Vec<StagingRecord>, FixtureError> {
        let mut seeded = Vec::with_capacity(self.descriptions.len());

        for fixture in &self.descriptions {
            let product_id = ProductId::new(fixture.product_id.clone());
            let seed_error = |source| FixtureError::Seed {
                product_id: product_id.clone(),
                source,
            };

            let mut record = store
                .create(NewStagingRecord {
                    product_id: product_id.clone(),
                    image_url: fixture.image_url.clone(),
                    product_name: fixture.product_name.clone(),
                    product_type: fixture.product_type.clone(),
                })
                .await
                .map_err(seed_error)?;

            let descriptions = fixture.descriptions();

            if !descriptions.is_empty() {
                record = store
                    .update_descriptions(&record, descriptions)
                    .await
                    .map_err(seed_error)?;
            }

            seeded.push(record);
        }

        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Write, sync::Arc};

    use testresult::TestResult;

    use crate::{platform::InMemoryCustomObjects, staging::PlatformStagingStore};

    use super::*;

    const YAML: &str = r"
descriptions:
  - product_id: p1
    image_url: img.png
    product_name: Widget
    product_type: toy
  - product_id: p2
    image_url: img2.png
    product_name: Gadget
    product_type: tool
    us: A great gadget
    de: Ein tolles Gerät
";

    #[test]
    fn parses_drafts_with_optional_locales() -> TestResult {
        let fixture = DescriptionsFixture::from_yaml(YAML)?;

        assert_eq!(fixture.descriptions.len(), 2);

        let second = fixture
            .descriptions
            .get(1)
            .ok_or("second draft missing")?
            .descriptions();

        assert_eq!(second.get(Locale::EnUs), Some("A great gadget"));
        assert_eq!(second.get(Locale::EnGb), None);

        Ok(())
    }

    #[test]
    fn load_reads_fixture_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        file.write_all(YAML.as_bytes())?;

        let fixture = DescriptionsFixture::load(file.path())?;

        assert_eq!(fixture.descriptions.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_fields_are_yaml_errors() {
        let result = DescriptionsFixture::from_yaml("descriptions:\n  - product_id: p1\n");

        assert!(
            matches!(result, Err(FixtureError::Yaml(_))),
            "expected Yaml error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn seed_creates_records_and_fills_locales() -> TestResult {
        let store = PlatformStagingStore::new(Arc::new(InMemoryCustomObjects::new()));

        let seeded = DescriptionsFixture::from_yaml(YAML)?.seed(&store).await?;

        assert_eq!(seeded.len(), 2);

        let listed = store.list().await?;
        let gadget = listed
            .iter()
            .find(|record| record.key.as_str() == "p2")
            .ok_or("p2 not seeded")?;

        assert_eq!(
            gadget.value.descriptions.get(Locale::DeDe),
            Some("Ein tolles Gerät")
        );

        Ok(())
    }

    #[tokio::test]
    async fn seeding_twice_reports_duplicate_product() -> TestResult {
        let store = PlatformStagingStore::new(Arc::new(InMemoryCustomObjects::new()));
        let fixture = DescriptionsFixture::from_yaml(YAML)?;

        fixture.seed(&store).await?;

        let result = fixture.seed(&store).await;

        assert!(
            matches!(
                result,
                Err(FixtureError::Seed {
                    source: StagingStoreError::DuplicateKey(_),
                    ..
                })
            ),
            "expected duplicate seed failure, got {result:?}"
        );

        Ok(())
    }
}
