//! Wiremock-backed client setup.

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use super::{CommercetoolsClient, CommercetoolsConfig, CommercetoolsError};

/// A client for project `shop` whose API and auth server is `server`.
pub(crate) async fn client(server: &MockServer) -> Result<CommercetoolsClient, CommercetoolsError> {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 172_800
        })))
        .mount(server)
        .await;

    CommercetoolsClient::new(CommercetoolsConfig {
        api_url: server.uri(),
        auth_url: server.uri(),
        project_key: "shop".to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        scopes: None,
    })
}

/// Wire form of a staged description object.
pub(crate) fn custom_object(key: &str, version: u64) -> serde_json::Value {
    serde_json::json!({
        "id": format!("obj-{key}"),
        "version": version,
        "container": "temporaryDescription",
        "key": key,
        "value": {
            "imageUrl": format!("https://img.example/{key}.png"),
            "productName": "Widget",
            "productType": "toy",
            "usDescription": null,
            "gbDescription": null,
            "deDescription": null
        },
        "createdAt": "2024-03-05T14:07:59.000Z",
        "lastModifiedAt": "2024-03-05T14:07:59.000Z"
    })
}
