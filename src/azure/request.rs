use crate::azure::endpoints::CloudEndpoints;
use crate::Verbosity;

/// Default ARM API version used when none is given.
pub const DEFAULT_REST_API_VERSION: &str = "2020-10-01";
/// Default Graph API version used when none is given.
pub const DEFAULT_GRAPH_API_VERSION: &str = "v1.0";

/// A single ARM resource lookup.
///
/// `resource` is a provider path such as
/// `Microsoft.Authorization/roleAssignmentScheduleInstances`; `scope` is an
/// optional subscription, resource group, or resource prefix under which the
/// lookup runs.
#[derive(Clone, Debug)]
pub struct RestRequest {
    pub resource: String,
    pub scope: Option<String>,
    pub api_version: String,
    pub verbosity: Verbosity,
    pub ignore_errors: bool,
}

impl RestRequest {
    /// Request for `resource` with the default API version, `Information`
    /// verbosity, and `ignore_errors` set.
    pub fn new(resource: &str) -> Self {
        RestRequest {
            resource: resource.to_string(),
            scope: None,
            api_version: DEFAULT_REST_API_VERSION.to_string(),
            verbosity: Verbosity::default(),
            ignore_errors: true,
        }
    }

    /// Scope the lookup to a subscription, resource group, or resource path.
    pub fn scope(mut self, scope: &str) -> Self {
        self.scope = Some(scope.to_string());
        self
    }

    /// Override the ARM API version.
    pub fn api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// Set the logging verbosity for this call.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Choose between the `None` sentinel and process termination on failure.
    pub fn ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    /// Compose the full request URL.
    ///
    /// Scoped lookups become `{management}{scope}/providers/{resource}`,
    /// unscoped ones `{management}/{resource}`; a missing leading slash on the
    /// scope is tolerated.
    pub(crate) fn url(&self, endpoints: &CloudEndpoints) -> String {
        match &self.scope {
            Some(scope) => {
                let separator = if scope.starts_with('/') { "" } else { "/" };
                format!(
                    "{}{}{}/providers/{}?api-version={}",
                    endpoints.management, separator, scope, self.resource, self.api_version
                )
            }
            None => format!(
                "{}/{}?api-version={}",
                endpoints.management, self.resource, self.api_version
            ),
        }
    }
}

/// A single Microsoft Graph lookup with an optional `$filter`.
#[derive(Clone, Debug)]
pub struct GraphRequest {
    pub resource: String,
    pub api_version: String,
    pub filter: Option<String>,
    pub verbosity: Verbosity,
    pub ignore_errors: bool,
}

impl GraphRequest {
    /// Request for `resource` with the default API version, `Information`
    /// verbosity, and `ignore_errors` set.
    pub fn new(resource: &str) -> Self {
        GraphRequest {
            resource: resource.to_string(),
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            filter: None,
            verbosity: Verbosity::default(),
            ignore_errors: true,
        }
    }

    /// Attach an OData `$filter` expression; it is URL-encoded automatically.
    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    /// Override the Graph API version (`v1.0` or `beta`).
    pub fn api_version(mut self, api_version: &str) -> Self {
        self.api_version = api_version.to_string();
        self
    }

    /// Set the logging verbosity for this call.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Choose between the `None` sentinel and process termination on failure.
    pub fn ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    /// Compose the full request URL, `$filter` included.
    pub(crate) fn url(&self, endpoints: &CloudEndpoints) -> String {
        let mut url = format!(
            "{}/{}/{}",
            endpoints.graph, self.api_version, self.resource
        );
        if let Some(filter) = &self.filter {
            url.push_str("?$filter=");
            url.push_str(&urlencoding::encode(filter));
        }
        url
    }
}
