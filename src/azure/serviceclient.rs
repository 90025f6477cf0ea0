use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::auth::credentials::ClientCredentials;
use crate::auth::token::{default_cache_dir, TokenManager};
use crate::azure::endpoints::CloudEndpoints;
use crate::azure::parse;
use crate::azure::request::{GraphRequest, RestRequest};
use crate::error::{Error, Result};
use crate::{ApiFamily, Verbosity};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Materialized outcome of a call.
///
/// List payloads are fully paginated into `Collection`, everything else is
/// returned verbatim as `Single`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// A single resource document.
    Single(Value),
    /// The concatenated `value` arrays of every page, in page order.
    Collection(Vec<Value>),
}

impl CallResult {
    /// The single resource document, if this is not a collection.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            CallResult::Single(value) => Some(value),
            CallResult::Collection(_) => None,
        }
    }

    /// The collection items, if this is a list result.
    pub fn as_collection(&self) -> Option<&[Value]> {
        match self {
            CallResult::Single(_) => None,
            CallResult::Collection(items) => Some(items),
        }
    }

    /// Convert into a plain JSON value, collections becoming arrays.
    pub fn into_value(self) -> Value {
        match self {
            CallResult::Single(value) => value,
            CallResult::Collection(items) => Value::Array(items),
        }
    }
}

/// HTTP client for ARM and Microsoft Graph GET operations.
///
/// Holds the token manager and retry policy; each call acquires (or reuses) a
/// token for its API family, issues the GET, retries transient failures, and
/// paginates list responses to completion.
pub struct ServiceClient {
    client: Client,
    credentials: ClientCredentials,
    endpoints: CloudEndpoints,
    cache_dir: PathBuf,
    tokens: TokenManager,
    max_attempts: u32,
    retry_base_delay: Duration,
}

impl ServiceClient {
    /// Create a client for the public Azure cloud with the default token
    /// cache location and retry policy.
    pub fn new(credentials: ClientCredentials) -> Self {
        let endpoints = CloudEndpoints::default();
        let cache_dir = default_cache_dir();
        let tokens = TokenManager::new(credentials.clone(), endpoints.clone(), &cache_dir);
        ServiceClient {
            client: Client::new(),
            credentials,
            endpoints,
            cache_dir,
            tokens,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }

    /// Create a client from the `ARM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(ServiceClient::new(ClientCredentials::from_env()?))
    }

    /// Substitute the cloud endpoints, e.g. for a sovereign cloud or a test server.
    pub fn with_endpoints(mut self, endpoints: CloudEndpoints) -> Self {
        self.endpoints = endpoints;
        self.rebuild_tokens();
        self
    }

    /// Substitute the directory holding the per-family token cache files.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self.rebuild_tokens();
        self
    }

    /// Override the retry policy.
    ///
    /// `max_attempts` bounds the total number of attempts per request; the
    /// backoff delay starts at `base_delay` and doubles per retry, with a
    /// parseable `Retry-After` header taking precedence on 429 responses.
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    fn rebuild_tokens(&mut self) {
        self.tokens = TokenManager::new(
            self.credentials.clone(),
            self.endpoints.clone(),
            &self.cache_dir,
        );
    }

    /// Perform an ARM lookup, returning the typed result.
    pub async fn try_call_rest(&mut self, request: &RestRequest) -> Result<CallResult> {
        let url = request.url(&self.endpoints);
        self.dispatch(ApiFamily::Rest, &url, request.verbosity).await
    }

    /// Perform an ARM lookup with the sentinel contract.
    ///
    /// On failure, exactly one error entry is printed; the call then returns
    /// `None` when `ignore_errors` is set, and terminates the process
    /// otherwise.
    pub async fn call_rest(&mut self, request: &RestRequest) -> Option<CallResult> {
        let url = request.url(&self.endpoints);
        let outcome = self.dispatch(ApiFamily::Rest, &url, request.verbosity).await;
        settle(outcome, &url, request.ignore_errors)
    }

    /// Perform a Graph lookup, returning the typed result.
    pub async fn try_call_graph(&mut self, request: &GraphRequest) -> Result<CallResult> {
        let url = request.url(&self.endpoints);
        self.dispatch(ApiFamily::Graph, &url, request.verbosity).await
    }

    /// Perform a Graph lookup with the sentinel contract.
    ///
    /// Same failure behavior as [`ServiceClient::call_rest`].
    pub async fn call_graph(&mut self, request: &GraphRequest) -> Option<CallResult> {
        let url = request.url(&self.endpoints);
        let outcome = self.dispatch(ApiFamily::Graph, &url, request.verbosity).await;
        settle(outcome, &url, request.ignore_errors)
    }

    /// Execute the initial request and paginate when the body is a list payload.
    async fn dispatch(
        &mut self,
        family: ApiFamily,
        url: &str,
        verbosity: Verbosity,
    ) -> Result<CallResult> {
        let first = self.execute(family, url, verbosity).await?;

        if let Some((code, message)) = parse::error_details(&first) {
            return Err(Error::Api { code, message });
        }

        let Some(mut items) = parse::value_items(&first) else {
            return Ok(CallResult::Single(first));
        };

        let mut next = parse::next_link(&first, family);
        while let Some(link) = next {
            let page = self
                .execute(family, &link, verbosity)
                .await
                .map_err(|err| Error::Pagination(Box::new(err)))?;

            if let Some((code, message)) = parse::error_details(&page) {
                return Err(Error::Pagination(Box::new(Error::Api { code, message })));
            }

            let Some(page_items) = parse::value_items(&page) else {
                return Err(Error::Pagination(Box::new(Error::Api {
                    code: "InvalidResponse".to_string(),
                    message: format!("continuation page {link} has no value array"),
                })));
            };

            items.extend(page_items);
            next = parse::next_link(&page, family);
        }

        Ok(CallResult::Collection(items))
    }

    /// GET `url` with a bearer token, retrying transient failures.
    ///
    /// Network errors, 5xx, and 429 count against the attempt limit; other
    /// 4xx responses fail immediately.
    async fn execute(
        &mut self,
        family: ApiFamily,
        url: &str,
        verbosity: Verbosity,
    ) -> Result<Value> {
        let mut delay = self.retry_base_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let token = self.tokens.get_token(family).await?;

            if matches!(verbosity, Verbosity::Verbose) {
                println!("GET {url}");
                println!("headers: Authorization: Bearer <redacted>, Accept: application/json");
            }

            let response = match self
                .client
                .get(url)
                .bearer_auth(&token)
                .header("Accept", "application/json")
                .send()
                .await
            {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(Error::Transient {
                            attempts: attempt,
                            message: format!("request failed: {err}"),
                        });
                    }
                    log::warn!(
                        "request error, retry {attempt}/{}: {err}",
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs);
                let body = response.text().await.unwrap_or_default();

                if attempt >= self.max_attempts {
                    return Err(Error::Transient {
                        attempts: attempt,
                        message: format!("{status}: {body}"),
                    });
                }

                let wait = retry_after.unwrap_or(delay);
                log::warn!(
                    "transient status {status}, retry {attempt}/{} after {wait:?}",
                    self.max_attempts
                );
                tokio::time::sleep(wait).await;
                delay *= 2;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::ClientHttp { status, body });
            }

            return response.json().await.map_err(Error::from);
        }
    }
}

/// Apply the sentinel failure policy to a call outcome.
fn settle(outcome: Result<CallResult>, url: &str, ignore_errors: bool) -> Option<CallResult> {
    match outcome {
        Ok(result) => Some(result),
        Err(err) => {
            println!("Error calling {url}: {err}");
            if ignore_errors {
                None
            } else {
                std::process::exit(1)
            }
        }
    }
}
