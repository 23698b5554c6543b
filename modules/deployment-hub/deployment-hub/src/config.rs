//! Deployment hub module configuration.

use std::time::Duration;

use deployment_hub_sdk::{TeamRecord, UserRecord};
use serde::{Deserialize, Serialize};

/// Environment variable read for tenant credentials when nothing else is configured.
pub const DEFAULT_CREDENTIALS_ENV: &str = "AI_CORE_TEAMS_CREDENTIALS";

/// Metadata key under which a user's supplemental tenant names are listed.
pub const DEFAULT_SUPPLEMENTAL_TENANTS_KEY: &str = "ai_core_teams";

/// Deployment hub module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploymentHubConfig {
    // === Credential Source ===
    /// Environment variable holding the credential JSON array.
    pub credentials_env: String,
    /// Inline credential JSON array. Replaces the environment source when set.
    pub credentials_json: Option<String>,

    // === Team Resolution ===
    /// Metadata key listing supplemental tenant names.
    pub supplemental_tenants_key: String,

    // === Outbound HTTP ===
    /// Timeout of every outbound call in milliseconds.
    pub request_timeout_ms: u64,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Header carrying the tenant's resource group on tenant API calls.
    pub resource_group_header: String,

    // === Token Cache ===
    /// Seconds before expiry at which a cached token counts as stale.
    pub token_refresh_margin_sec: u64,
    /// Lifetime assumed when the token response omits `expires_in`.
    pub default_token_ttl_sec: u64,
    /// How client credentials are presented to the OAuth endpoint.
    pub token_auth_method: ClientAuthMethod,
}

impl Default for DeploymentHubConfig {
    fn default() -> Self {
        Self {
            credentials_env: DEFAULT_CREDENTIALS_ENV.to_owned(),
            credentials_json: None,

            supplemental_tenants_key: DEFAULT_SUPPLEMENTAL_TENANTS_KEY.to_owned(),

            request_timeout_ms: 15_000,
            connect_timeout_ms: 5_000,
            resource_group_header: "AI-Resource-Group".to_owned(),

            token_refresh_margin_sec: 60,
            default_token_ttl_sec: 300,
            token_auth_method: ClientAuthMethod::Basic,
        }
    }
}

impl DeploymentHubConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn token_refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin_sec)
    }

    #[must_use]
    pub fn default_token_ttl(&self) -> Duration {
        Duration::from_secs(self.default_token_ttl_sec)
    }
}

/// `OAuth2` client authentication method.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// `Authorization: Basic base64(client_id:client_secret)`
    #[default]
    Basic,
    /// `client_id` and `client_secret` as form fields.
    Form,
}

/// Users and teams served by the config-backed directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticDirectoryConfig {
    pub users: Vec<UserRecord>,
    pub teams: Vec<TeamRecord>,
}
