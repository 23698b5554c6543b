//! Output ports (interfaces) for domain services.

use std::time::Duration;

use async_trait::async_trait;
use deployment_hub_sdk::{ConfigurationRequest, CreatedDeployment, Deployment};
use secrecy::SecretString;
use thiserror::Error;

use super::credentials::TenantCredential;

/// Port for reading the raw tenant credential blob.
pub trait CredentialSource: Send + Sync {
    /// Human-readable description used in errors and logs.
    fn describe(&self) -> String;

    /// Raw JSON, or `None` when the source is absent.
    fn read(&self) -> Option<String>;
}

/// Result of one client-credentials exchange.
#[derive(Debug)]
pub struct IssuedToken {
    pub access_token: SecretString,
    /// Lifetime reported by the OAuth endpoint, if any.
    pub expires_in: Option<Duration>,
}

/// Errors of the outbound `OAuth2` client-credentials exchange.
///
/// No variant ever carries the client secret or an access token.
#[derive(Debug, Error)]
pub enum TokenSourceError {
    /// Transport failure (unreachable, timeout, TLS).
    #[error("{0}")]
    Http(String),

    #[error("token endpoint answered HTTP {status}")]
    Status { status: u16 },

    /// Unparseable or incomplete token response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// `token_type` other than `Bearer`.
    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),
}

/// Port for exchanging a tenant's client credentials for a bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(
        &self,
        credential: &TenantCredential,
    ) -> Result<IssuedToken, TokenSourceError>;
}

/// Errors of a tenant API call.
#[derive(Debug, Error)]
pub enum TenantApiError {
    /// Transport failure (unreachable, timeout, TLS).
    #[error("tenant request failed: {0}")]
    Transport(String),

    /// Non-success status.
    #[error("tenant answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status with a body that does not parse.
    #[error("unreadable tenant response: {0}")]
    Decode(String),
}

impl TenantApiError {
    /// Whether the tenant rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

/// One page of a tenant's deployment list.
#[derive(Debug, Clone)]
pub struct DeploymentPage {
    /// Count reported by the tenant.
    pub count: u64,
    pub deployments: Vec<Deployment>,
}

/// The tenant's answer to a configuration creation.
#[derive(Debug, Clone)]
pub struct CreatedConfiguration {
    pub id: String,
    pub message: Option<String>,
}

/// Port for the per-tenant ML-platform API.
#[async_trait]
pub trait TenantApi: Send + Sync {
    /// `GET {apiUrl}/deployments`
    async fn list_deployments(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
    ) -> Result<DeploymentPage, TenantApiError>;

    /// `POST {apiUrl}/configurations`
    async fn create_configuration(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
        request: &ConfigurationRequest,
    ) -> Result<CreatedConfiguration, TenantApiError>;

    /// `POST {apiUrl}/deployments`
    async fn create_deployment(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
        configuration_id: &str,
        ttl: Option<&str>,
    ) -> Result<CreatedDeployment, TenantApiError>;
}
