/// Authentication helpers for the Microsoft identity client-credentials flow.
pub mod auth;
/// ARM and Microsoft Graph call composition, execution, and pagination.
pub mod azure;
/// Error types returned by this crate.
pub mod error;
/// JSON pretty-printing and file dump helpers.
pub mod json;

/// Logging verbosity for client operations.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Emit standard informational output.
    Information,
    /// Print the fully composed request to stdout before sending.
    Verbose,
}

impl Default for Verbosity {
    /// Defaults to `Information` logging.
    fn default() -> Self {
        Verbosity::Information
    }
}

/// Backend API family addressed by a call.
///
/// Each family has its own token audience, base URL, continuation field, and
/// persistent token cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// Azure Resource Manager REST API.
    Rest,
    /// Microsoft Graph API.
    Graph,
}

impl ApiFamily {
    /// File name of the persistent token cache for this family.
    pub(crate) fn cache_file_name(self) -> &'static str {
        match self {
            ApiFamily::Rest => "rest_token_cache.json",
            ApiFamily::Graph => "graph_token_cache.json",
        }
    }

    /// Continuation field in list responses of this family.
    pub(crate) fn next_link_field(self) -> &'static str {
        match self {
            ApiFamily::Rest => "nextLink",
            ApiFamily::Graph => "@odata.nextLink",
        }
    }
}
