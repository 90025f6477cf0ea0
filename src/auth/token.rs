use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::auth::credentials::{fetch_client_credentials_token, ClientCredentials};
use crate::azure::endpoints::CloudEndpoints;
use crate::error::Result;
use crate::ApiFamily;

const REFRESH_SKEW_SECS: i64 = 300;

/// Access token with its expiry instant, as persisted in the cache file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True when the token is expired or expires within the refresh skew.
    pub fn is_expiring_soon(&self) -> bool {
        Utc::now() + Duration::seconds(REFRESH_SKEW_SECS) >= self.expires_at
    }
}

/// On-disk token cache for one API family.
///
/// Tokens are keyed by their scope string. A missing or unparsable file is
/// treated as an empty cache; concurrent processes sharing the same file may
/// race, and the last writer wins.
pub struct TokenCache {
    path: PathBuf,
    entries: HashMap<String, CachedToken>,
}

impl TokenCache {
    /// Load the cache file at `path`, starting afresh when it is absent or corrupt.
    pub fn load(path: PathBuf) -> Self {
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    log::warn!(
                        "token cache {} is unreadable, starting afresh: {err}",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        TokenCache { path, entries }
    }

    /// Return the cached token for `scope` when present and not expiring soon.
    pub fn get_valid(&self, scope: &str) -> Option<&CachedToken> {
        self.entries
            .get(scope)
            .filter(|token| !token.access_token.trim().is_empty() && !token.is_expiring_soon())
    }

    /// Insert or replace the token for `scope` in memory.
    pub fn insert(&mut self, scope: String, token: CachedToken) {
        self.entries.insert(scope, token);
    }

    /// Write the cache back to its file, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }
}

/// Default directory for the per-family token cache files.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("azure-api-client")
}

/// Acquires and caches access tokens, one cache file per API family.
///
/// An expired or missing token always triggers a synchronous re-acquisition
/// before any API call proceeds. Persistence failures after an acquisition
/// are logged and non-fatal; the token stays usable in memory.
pub struct TokenManager {
    credentials: ClientCredentials,
    endpoints: CloudEndpoints,
    cache_dir: PathBuf,
    client: Client,
    caches: HashMap<ApiFamily, TokenCache>,
}

impl TokenManager {
    /// Create a manager for the given credentials and cloud endpoints.
    pub fn new(
        credentials: ClientCredentials,
        endpoints: CloudEndpoints,
        cache_dir: impl AsRef<Path>,
    ) -> Self {
        TokenManager {
            credentials,
            endpoints,
            cache_dir: cache_dir.as_ref().to_path_buf(),
            client: Client::new(),
            caches: HashMap::new(),
        }
    }

    /// Return a valid access token for `family`, acquiring one when the cache
    /// has no usable entry.
    pub async fn get_token(&mut self, family: ApiFamily) -> Result<String> {
        let scope = self.endpoints.token_scope(family);
        let cache = self
            .caches
            .entry(family)
            .or_insert_with(|| TokenCache::load(self.cache_dir.join(family.cache_file_name())));

        if let Some(token) = cache.get_valid(&scope) {
            return Ok(token.access_token.clone());
        }

        let acquired = fetch_client_credentials_token(
            &self.client,
            &self.endpoints.token_url(&self.credentials.tenant_id),
            &self.credentials,
            &scope,
        )
        .await?;

        let token = CachedToken {
            access_token: acquired.access_token,
            expires_at: acquired.expires_at,
        };
        cache.insert(scope, token.clone());
        if let Err(err) = cache.save() {
            log::warn!("failed to persist token cache: {err}");
        }

        Ok(token.access_token)
    }
}
