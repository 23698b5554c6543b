//! Domain models for the deployment hub module.
//!
//! Field names serialize in camelCase, the shape the ML platform itself uses,
//! so the routing layer can pass these through unchanged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lifecycle status of a deployment as reported by the tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Pending,
    Running,
    Completed,
    Dead,
    Stopping,
    Stopped,
    /// Anything the tenant reports that this SDK does not know yet.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A deployment running on one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    #[serde(default)]
    pub status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub modified_at: Option<OffsetDateTime>,
}

/// Deployments of a single tenant that answered successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDeployments {
    /// Tenant (team) name.
    pub tenant: String,
    /// Deployment count reported by the tenant.
    pub count: u64,
    pub deployments: Vec<Deployment>,
}

/// Deployments merged across every tenant that answered successfully.
///
/// Failed or uncredentialed tenants do not appear at all, not even as
/// empty entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDeployments {
    /// Per-tenant results in tenant resolution order.
    pub tenants: Vec<TenantDeployments>,
    /// Sum of `count` over `tenants`.
    pub total: u64,
}

impl AggregatedDeployments {
    /// Build the aggregate from successful per-tenant results, keeping their order.
    #[must_use]
    pub fn from_tenants(tenants: Vec<TenantDeployments>) -> Self {
        let total = tenants.iter().map(|t| t.count).sum();
        Self { tenants, total }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

/// A single `key = value` parameter binding of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub key: String,
    pub value: String,
}

/// Inline definition of a configuration to create before deploying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRequest {
    pub name: String,
    pub executable_id: String,
    pub scenario_id: String,
    #[serde(default)]
    pub parameter_bindings: Vec<ParameterBinding>,
}

/// Request to create a deployment on the caller's own team.
///
/// Exactly one of `configuration_id` and `configuration_request` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    /// Reference to a configuration that already exists on the tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_id: Option<String>,
    /// Configuration to create first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_request: Option<ConfigurationRequest>,
    /// Time-to-live passed through to the tenant (for example `"2h"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

impl CreateDeploymentRequest {
    #[must_use]
    pub fn from_configuration_id(id: impl Into<String>, ttl: Option<String>) -> Self {
        Self {
            configuration_id: Some(id.into()),
            configuration_request: None,
            ttl,
        }
    }

    #[must_use]
    pub fn from_configuration_request(request: ConfigurationRequest, ttl: Option<String>) -> Self {
        Self {
            configuration_id: None,
            configuration_request: Some(request),
            ttl,
        }
    }
}

/// The tenant's answer to a deployment creation, passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedDeployment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeploymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}
