//! Authorised HTTP access to a commercetools project.

use std::fmt;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::debug;

use super::{
    auth::ClientCredentials,
    errors::{CommercetoolsError, ErrorResponse},
};

/// Connection settings for a commercetools project.
#[derive(Clone)]
pub struct CommercetoolsConfig {
    /// HTTP API URL, e.g. `"https://api.europe-west1.gcp.commercetools.com"`.
    pub api_url: String,

    /// Auth server URL, e.g. `"https://auth.europe-west1.gcp.commercetools.com"`.
    pub auth_url: String,

    /// Project key.
    pub project_key: String,

    /// API client ID.
    pub client_id: String,

    /// API client secret.
    pub client_secret: String,

    /// Space-separated OAuth scopes.
    pub scopes: Option<String>,
}

impl fmt::Debug for CommercetoolsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommercetoolsConfig")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// HTTP client for one commercetools project.
#[derive(Debug)]
pub struct CommercetoolsClient {
    project_url: Url,
    http: Client,
    credentials: ClientCredentials,
}

impl CommercetoolsClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CommercetoolsError::InvalidUrl`] when the API URL cannot be
    /// parsed or cannot carry a path.
    pub fn new(config: CommercetoolsConfig) -> Result<Self, CommercetoolsError> {
        let mut project_url = Url::parse(&config.api_url)
            .map_err(|error| CommercetoolsError::InvalidUrl(format!("{}: {error}", config.api_url)))?;

        project_url
            .path_segments_mut()
            .map_err(|()| CommercetoolsError::InvalidUrl(config.api_url.clone()))?
            .pop_if_empty()
            .push(&config.project_key);

        Ok(Self {
            project_url,
            http: Client::new(),
            credentials: ClientCredentials::new(
                &config.auth_url,
                config.client_id,
                config.client_secret,
                config.scopes,
            ),
        })
    }

    /// Project URL extended by `segments`, each percent-encoded.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, CommercetoolsError> {
        let mut url = self.project_url.clone();

        url.path_segments_mut()
            .map_err(|()| CommercetoolsError::InvalidUrl(self.project_url.to_string()))?
            .extend(segments);

        Ok(url)
    }

    pub(super) fn http(&self) -> &Client {
        &self.http
    }

    /// Send `request` with a bearer token attached.
    pub(super) async fn send(&self, request: RequestBuilder) -> Result<Response, CommercetoolsError> {
        let token = self.credentials.access_token(&self.http).await?;
        let response = request.bearer_auth(token).send().await?;

        debug!(status = %response.status(), url = %response.url(), "commercetools response");

        Ok(response)
    }
}

/// Map a non-2xx response onto [`CommercetoolsError`].
pub(super) async fn error_for(response: Response, action: &str) -> CommercetoolsError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match status {
        StatusCode::NOT_FOUND => CommercetoolsError::NotFound,
        StatusCode::CONFLICT => CommercetoolsError::Conflict {
            current_version: ErrorResponse::current_version(&text),
        },
        _ => CommercetoolsError::UnexpectedResponse(format!(
            "{action} failed with status {status}: {text}"
        )),
    }
}
