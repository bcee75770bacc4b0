//! Commercetools errors.

use pixelphraser::platform::PlatformError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when communicating with commercetools.
#[derive(Debug, Error)]
pub enum CommercetoolsError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured API or auth URL cannot be used.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The auth server refused the client credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The resource version did not match.
    #[error("concurrent modification")]
    Conflict {
        /// Server-side version, when reported.
        current_version: Option<u64>,
    },

    /// The resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// Commercetools returned a non-2xx response or unexpected body.
    #[error("unexpected response from commercetools: {0}")]
    UnexpectedResponse(String),
}

impl From<CommercetoolsError> for PlatformError {
    fn from(error: CommercetoolsError) -> Self {
        match error {
            CommercetoolsError::Conflict { current_version } => Self::Conflict { current_version },
            CommercetoolsError::NotFound => Self::NotFound,
            error => Self::External(Box::new(error)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(default)]
    pub(super) errors: Vec<ErrorObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ErrorObject {
    pub(super) code: String,

    #[serde(default)]
    pub(super) current_version: Option<u64>,
}

impl ErrorResponse {
    /// `currentVersion` reported by a `ConcurrentModification` error.
    pub(super) fn current_version(body: &str) -> Option<u64> {
        serde_json::from_str::<Self>(body)
            .ok()?
            .errors
            .into_iter()
            .find(|error| error.code == "ConcurrentModification")
            .and_then(|error| error.current_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_current_version_from_conflict_body() {
        let body = r#"{
            "statusCode": 409,
            "message": "Object has a different version than expected.",
            "errors": [{"code": "ConcurrentModification", "currentVersion": 4}]
        }"#;

        assert_eq!(ErrorResponse::current_version(body), Some(4));
        assert_eq!(ErrorResponse::current_version("not json"), None);
    }

    #[test]
    fn domain_errors_keep_their_meaning() {
        let conflict = PlatformError::from(CommercetoolsError::Conflict {
            current_version: Some(2),
        });
        let missing = PlatformError::from(CommercetoolsError::NotFound);
        let other = PlatformError::from(CommercetoolsError::Auth("denied".to_string()));

        assert!(
            matches!(conflict, PlatformError::Conflict { current_version: Some(2) }),
            "unexpected {conflict:?}"
        );
        assert!(matches!(missing, PlatformError::NotFound), "unexpected {missing:?}");
        assert!(matches!(other, PlatformError::External(_)), "unexpected {other:?}");
    }
}
