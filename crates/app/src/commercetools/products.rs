//! Promotion of accepted descriptions onto commercetools products.

use std::sync::Arc;

use async_trait::async_trait;
use pixelphraser::{
    locales::{LiveDescriptions, Locale},
    promote::{ProductPromoter, PromoteError},
    staging::ProductId,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{
    client::{CommercetoolsClient, error_for},
    errors::CommercetoolsError,
};

#[derive(Debug, Deserialize)]
struct ProductVersion {
    version: u64,
}

#[derive(Debug, Serialize)]
struct ProductUpdate {
    version: u64,
    actions: Vec<UpdateAction>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum UpdateAction {
    SetDescription {
        description: Map<String, Value>,
        staged: bool,
    },
}

fn localized(descriptions: &LiveDescriptions) -> Map<String, Value> {
    Locale::ALL
        .iter()
        .map(|locale| {
            (
                locale.tag().to_string(),
                Value::String(descriptions.get(*locale).to_string()),
            )
        })
        .collect()
}

/// Writes live descriptions through the product update API.
#[derive(Debug, Clone)]
pub struct CommercetoolsPromoter {
    client: Arc<CommercetoolsClient>,
}

impl CommercetoolsPromoter {
    /// Promote through `client`.
    #[must_use]
    pub fn new(client: Arc<CommercetoolsClient>) -> Self {
        Self { client }
    }

    async fn current_version(&self, product: &ProductId) -> Result<u64, CommercetoolsError> {
        let url = self.client.endpoint(&["products", product.as_str()])?;
        let response = self.client.send(self.client.http().get(url)).await?;

        if !response.status().is_success() {
            return Err(error_for(response, "product fetch").await);
        }

        let product: ProductVersion = response.json().await?;

        Ok(product.version)
    }

    async fn set_description(
        &self,
        product: &ProductId,
        version: u64,
        descriptions: &LiveDescriptions,
    ) -> Result<(), CommercetoolsError> {
        let url = self.client.endpoint(&["products", product.as_str()])?;
        let update = ProductUpdate {
            version,
            actions: vec![UpdateAction::SetDescription {
                description: localized(descriptions),
                staged: false,
            }],
        };

        let response = self
            .client
            .send(self.client.http().post(url).json(&update))
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response, "product update").await);
        }

        Ok(())
    }
}

#[async_trait]
impl ProductPromoter for CommercetoolsPromoter {
    async fn promote(
        &self,
        product: &ProductId,
        descriptions: &LiveDescriptions,
    ) -> Result<(), PromoteError> {
        let promote_error = |error: CommercetoolsError| match error {
            CommercetoolsError::NotFound => PromoteError::ProductNotFound(product.clone()),
            error => PromoteError::External(Box::new(error)),
        };

        let version = self.current_version(product).await.map_err(promote_error)?;

        self.set_description(product, version, descriptions)
            .await
            .map_err(promote_error)?;

        info!(product_id = %product, version, "product description updated");

        Ok(())
    }
}
