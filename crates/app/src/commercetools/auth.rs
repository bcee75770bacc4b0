//! OAuth2 client-credentials tokens.

use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::errors::CommercetoolsError;

/// Tokens are refreshed this long before the server-side expiry.
const EXPIRY_MARGIN: SignedDuration = SignedDuration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Timestamp,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Client-credentials grant against the commercetools auth server.
pub(super) struct ClientCredentials {
    token_url: String,
    client_id: String,
    client_secret: String,
    scopes: Option<String>,
    cached: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl ClientCredentials {
    pub(super) fn new(
        auth_url: &str,
        client_id: String,
        client_secret: String,
        scopes: Option<String>,
    ) -> Self {
        Self {
            token_url: format!("{}/oauth/token", auth_url.trim_end_matches('/')),
            client_id,
            client_secret,
            scopes,
            cached: Mutex::new(None),
        }
    }

    /// A bearer token, fetched on first use and again shortly before expiry.
    pub(super) async fn access_token(&self, http: &Client) -> Result<String, CommercetoolsError> {
        if let Some(token) = self.cached_token(Timestamp::now()) {
            return Ok(token);
        }

        let token = self.fetch(http).await?;
        let access_token = token.access_token.clone();

        *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);

        Ok(access_token)
    }

    fn cached_token(&self, now: Timestamp) -> Option<String> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|token| token.refresh_at > now)
            .map(|token| token.access_token.clone())
    }

    async fn fetch(&self, http: &Client) -> Result<CachedToken, CommercetoolsError> {
        debug!(client_id = %self.client_id, "requesting access token");

        let mut form = vec![("grant_type", "client_credentials")];

        if let Some(scopes) = &self.scopes {
            form.push(("scope", scopes.as_str()));
        }

        let response = http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(CommercetoolsError::Auth(format!(
                "token request failed with status {status}: {text}"
            )));
        }

        let parsed: TokenResponse = response.json().await?;
        let lifetime = SignedDuration::from_secs(parsed.expires_in).saturating_sub(EXPIRY_MARGIN);
        let refresh_at = Timestamp::now()
            .checked_add(lifetime)
            .map_err(|error| CommercetoolsError::Auth(format!("invalid token lifetime: {error}")))?;

        Ok(CachedToken {
            access_token: parsed.access_token,
            refresh_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header_exists, method, path},
    };

    use super::*;

    fn credentials(server: &MockServer, scopes: Option<&str>) -> ClientCredentials {
        ClientCredentials::new(
            &server.uri(),
            "client".to_string(),
            "secret".to_string(),
            scopes.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn token_is_fetched_once_and_cached() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header_exists("authorization"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=manage_project%3Ashop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "Bearer",
                "expires_in": 172_800,
                "scope": "manage_project:shop"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = credentials(&server, Some("manage_project:shop"));
        let http = Client::new();

        assert_eq!(credentials.access_token(&http).await?, "tok-1");
        assert_eq!(credentials.access_token(&http).await?, "tok-1");

        Ok(())
    }

    #[tokio::test]
    async fn short_lived_token_is_refreshed() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "expires_in": 30
            })))
            .expect(2)
            .mount(&server)
            .await;

        let credentials = credentials(&server, None);
        let http = Client::new();

        credentials.access_token(&http).await?;
        credentials.access_token(&http).await?;

        Ok(())
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let result = credentials(&server, None).access_token(&Client::new()).await;

        assert!(
            matches!(result, Err(CommercetoolsError::Auth(ref message)) if message.contains("401")),
            "expected Auth error, got {result:?}"
        );
    }
}
