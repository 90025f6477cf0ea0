use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::Value;

use crate::error::{Error, Result};

/// Environment variable holding the application (client) id.
pub const ENV_CLIENT_ID: &str = "ARM_CLIENT_ID";
/// Environment variable holding the client secret.
pub const ENV_CLIENT_SECRET: &str = "ARM_CLIENT_SECRET";
/// Environment variable holding the tenant id.
pub const ENV_TENANT_ID: &str = "ARM_TENANT_ID";

/// Service principal credentials for the client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Directory (tenant) id.
    pub tenant_id: String,
}

impl ClientCredentials {
    /// Read credentials from the `ARM_CLIENT_ID`, `ARM_CLIENT_SECRET`, and
    /// `ARM_TENANT_ID` environment variables.
    ///
    /// Fails with [`Error::Configuration`] naming the first missing variable,
    /// before any network call is attempted.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    Error::Configuration(format!("missing environment variable {name}"))
                })
        };

        Ok(ClientCredentials {
            client_id: require(ENV_CLIENT_ID)?,
            client_secret: require(ENV_CLIENT_SECRET)?,
            tenant_id: require(ENV_TENANT_ID)?,
        })
    }
}

/// Access token freshly acquired from the identity endpoint.
pub struct AcquiredToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Perform an OAuth2 client-credentials token acquisition against `token_url`.
///
/// A rejection by the identity endpoint (invalid secret, unknown tenant,
/// disabled application) surfaces as [`Error::Authentication`] carrying the
/// response body.
pub async fn fetch_client_credentials_token(
    client: &Client,
    token_url: &str,
    credentials: &ClientCredentials,
    scope: &str,
) -> Result<AcquiredToken> {
    let mut params = HashMap::new();
    params.insert("client_id", credentials.client_id.as_str());
    params.insert("client_secret", credentials.client_secret.as_str());
    params.insert("scope", scope);
    params.insert("grant_type", "client_credentials");

    let resp = client.post(token_url).form(&params).send().await?;

    if !resp.status().is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Authentication(body));
    }

    let json: Value = resp.json().await?;

    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Authentication("no access_token in response".to_string()))?;
    let expires_in = json
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| Error::Authentication("no expires_in in response".to_string()))?;

    if access_token.trim().is_empty() {
        return Err(Error::Authentication("access token was empty".to_string()));
    }

    Ok(AcquiredToken {
        access_token: access_token.to_string(),
        expires_at: Utc::now() + Duration::seconds(expires_in),
    })
}
