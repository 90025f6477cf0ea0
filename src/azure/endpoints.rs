use crate::ApiFamily;

/// Base URLs of the identity, management, and graph endpoints.
///
/// Defaults to the public Azure cloud; tests and sovereign-cloud callers can
/// substitute their own hosts.
#[derive(Clone, Debug)]
pub struct CloudEndpoints {
    /// Identity (token) endpoint host, without trailing slash.
    pub login: String,
    /// Azure Resource Manager host, without trailing slash.
    pub management: String,
    /// Microsoft Graph host, without trailing slash.
    pub graph: String,
}

impl Default for CloudEndpoints {
    fn default() -> Self {
        CloudEndpoints {
            login: "https://login.microsoftonline.com".to_string(),
            management: "https://management.azure.com".to_string(),
            graph: "https://graph.microsoft.com".to_string(),
        }
    }
}

impl CloudEndpoints {
    /// Token endpoint URL for the tenant's v2.0 identity endpoint.
    pub(crate) fn token_url(&self, tenant_id: &str) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login, tenant_id)
    }

    /// OAuth2 scope requested for tokens of the given family.
    pub(crate) fn token_scope(&self, family: ApiFamily) -> String {
        match family {
            ApiFamily::Rest => format!("{}/.default", self.management),
            ApiFamily::Graph => format!("{}/.default", self.graph),
        }
    }
}
