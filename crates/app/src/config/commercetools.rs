//! Commercetools Config

use clap::Args;

use crate::commercetools::CommercetoolsConfig;

/// Commercetools project settings.
///
/// Only required when no fixture is given.
#[derive(Debug, Clone, Args)]
pub struct CommercetoolsArgs {
    /// Commercetools HTTP API URL
    #[arg(
        long = "ctp-api-url",
        env = "CTP_API_URL",
        default_value = "https://api.europe-west1.gcp.commercetools.com"
    )]
    pub api_url: String,

    /// Commercetools auth URL
    #[arg(
        long = "ctp-auth-url",
        env = "CTP_AUTH_URL",
        default_value = "https://auth.europe-west1.gcp.commercetools.com"
    )]
    pub auth_url: String,

    /// Commercetools project key
    #[arg(long = "ctp-project-key", env = "CTP_PROJECT_KEY")]
    pub project_key: Option<String>,

    /// API client ID
    #[arg(long = "ctp-client-id", env = "CTP_CLIENT_ID")]
    pub client_id: Option<String>,

    /// API client secret
    #[arg(long = "ctp-client-secret", env = "CTP_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Space-separated OAuth scopes; the client's own scopes when omitted
    #[arg(long = "ctp-scopes", env = "CTP_SCOPES")]
    pub scopes: Option<String>,
}

impl CommercetoolsArgs {
    /// Resolve into a client configuration.
    ///
    /// # Errors
    ///
    /// Returns the name of the first missing setting.
    pub fn into_config(self) -> Result<CommercetoolsConfig, &'static str> {
        Ok(CommercetoolsConfig {
            api_url: self.api_url,
            auth_url: self.auth_url,
            project_key: self.project_key.ok_or("CTP_PROJECT_KEY")?,
            client_id: self.client_id.ok_or("CTP_CLIENT_ID")?,
            client_secret: self.client_secret.ok_or("CTP_CLIENT_SECRET")?,
            scopes: self.scopes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CommercetoolsArgs {
        CommercetoolsArgs {
            api_url: "https://api.example".to_string(),
            auth_url: "https://auth.example".to_string(),
            project_key: Some("shop".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some("secret".to_string()),
            scopes: None,
        }
    }

    #[test]
    fn complete_args_resolve() {
        let config = args().into_config();

        assert!(
            matches!(config, Ok(ref config) if config.project_key == "shop"),
            "unexpected config: {config:?}"
        );
    }

    #[test]
    fn missing_secret_is_named() {
        let config = CommercetoolsArgs {
            client_secret: None,
            ..args()
        }
        .into_config();

        assert!(
            matches!(config, Err("CTP_CLIENT_SECRET")),
            "unexpected config: {config:?}"
        );
    }
}
