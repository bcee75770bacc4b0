//! Custom objects over the commercetools HTTP API.

use async_trait::async_trait;
use pixelphraser::platform::{CustomObject, CustomObjectDraft, CustomObjects, PlatformError};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    client::{CommercetoolsClient, error_for},
    errors::CommercetoolsError,
};

const PAGE_SIZE: usize = 500;

#[derive(Debug, Serialize)]
struct VersionedDraft<'a> {
    container: &'a str,
    key: &'a str,
    value: &'a Value,
    version: u64,
}

#[derive(Debug, Deserialize)]
struct PagedQueryResponse {
    results: Vec<CustomObject>,
}

impl CommercetoolsClient {
    async fn post_custom_object(
        &self,
        draft: &CustomObjectDraft,
        version: u64,
    ) -> Result<CustomObject, CommercetoolsError> {
        let url = self.endpoint(&["custom-objects"])?;
        let body = VersionedDraft {
            container: &draft.container,
            key: &draft.key,
            value: &draft.value,
            version,
        };

        let response = self.send(self.http().post(url).json(&body)).await?;

        if !response.status().is_success() {
            return Err(error_for(response, "custom object update").await);
        }

        Ok(response.json().await?)
    }

    async fn list_page(
        &self,
        container: &str,
        offset: usize,
    ) -> Result<Vec<CustomObject>, CommercetoolsError> {
        let url = self.endpoint(&["custom-objects", container])?;
        let request = self.http().get(url).query(&[
            ("sort", "createdAt asc".to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("offset", offset.to_string()),
            ("withTotal", "false".to_string()),
        ]);

        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(error_for(response, "custom object query").await);
        }

        let page: PagedQueryResponse = response.json().await?;

        Ok(page.results)
    }
}

#[async_trait]
impl CustomObjects for CommercetoolsClient {
    async fn create(&self, draft: CustomObjectDraft) -> Result<CustomObject, PlatformError> {
        // Version 0 makes the write create-only.
        match self.post_custom_object(&draft, 0).await {
            Ok(object) => Ok(object),
            Err(CommercetoolsError::Conflict { .. }) => Err(PlatformError::DuplicateKey {
                container: draft.container,
                key: draft.key,
            }),
            Err(error) => Err(error.into()),
        }
    }

    async fn list(&self, container: &str) -> Result<Vec<CustomObject>, PlatformError> {
        let mut objects = Vec::new();

        loop {
            let page = self.list_page(container, objects.len()).await?;
            let last_page = page.len() < PAGE_SIZE;

            objects.extend(page);

            if last_page {
                break;
            }
        }

        debug!(container, count = objects.len(), "listed custom objects");

        Ok(objects)
    }

    async fn get(&self, container: &str, key: &str) -> Result<Option<CustomObject>, PlatformError> {
        let url = self.endpoint(&["custom-objects", container, key])?;
        let response = self.send(self.http().get(url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(
                response.json().await.map_err(CommercetoolsError::from)?,
            )),
            _ => Err(error_for(response, "custom object fetch").await.into()),
        }
    }

    async fn update(
        &self,
        draft: CustomObjectDraft,
        version: u64,
    ) -> Result<CustomObject, PlatformError> {
        Ok(self.post_custom_object(&draft, version).await?)
    }

    async fn delete(&self, id: &str, version: u64) -> Result<(), PlatformError> {
        let url = self.endpoint(&["custom-objects", id])?;
        let request = self
            .http()
            .delete(url)
            .query(&[("version", version.to_string())]);

        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(error_for(response, "custom object delete").await.into());
        }

        Ok(())
    }
}
