//! Shared fixtures for the mock-server test suite.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azure_api_client::auth::credentials::ClientCredentials;
use azure_api_client::azure::endpoints::CloudEndpoints;
use azure_api_client::azure::serviceclient::ServiceClient;

pub const TENANT: &str = "test-tenant";

pub fn test_credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        tenant_id: TENANT.to_string(),
    }
}

/// Point every cloud endpoint at the mock server.
pub fn mock_endpoints(uri: &str) -> CloudEndpoints {
    CloudEndpoints {
        login: uri.to_string(),
        management: uri.to_string(),
        graph: uri.to_string(),
    }
}

/// Client wired to the mock server with a fast retry policy.
pub fn test_client(server: &MockServer, cache_dir: &Path) -> ServiceClient {
    ServiceClient::new(test_credentials())
        .with_endpoints(mock_endpoints(&server.uri()))
        .with_cache_dir(cache_dir)
        .with_retry(3, Duration::from_millis(10))
}

pub fn token_path() -> String {
    format!("/{TENANT}/oauth2/v2.0/token")
}

pub fn token_response() -> ResponseTemplate {
    token_response_expiring_in(3600)
}

pub fn token_response_expiring_in(expires_in: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": "test-access-token",
        "token_type": "Bearer",
        "expires_in": expires_in
    }))
}

/// Mount a token endpoint that answers every acquisition.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(token_path()))
        .respond_with(token_response())
        .mount(server)
        .await;
}

pub fn subscription(index: usize) -> Value {
    json!({
        "subscriptionId": format!("sub-{index}"),
        "displayName": format!("Subscription {index}")
    })
}

/// Wrap items in a list payload, attaching the continuation link when given.
pub fn page(items: Vec<Value>, next_field: &str, next: Option<String>) -> Value {
    let mut body = json!({ "value": items });
    if let Some(link) = next {
        body[next_field] = json!(link);
    }
    body
}
