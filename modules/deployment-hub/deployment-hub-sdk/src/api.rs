//! Public API trait for the deployment hub.
//!
//! The hub resolves which ML-platform tenants the caller may act on,
//! talks to each of them with per-tenant OAuth credentials, and merges the
//! answers.

use async_trait::async_trait;

use crate::error::DeploymentHubError;
use crate::models::{AggregatedDeployments, CreateDeploymentRequest, CreatedDeployment};

/// Public API trait for the deployment hub.
///
/// Callers are identified by the verified email supplied by the upstream
/// authentication layer. The hub never authenticates end users itself.
///
/// ```ignore
/// let hub: Arc<dyn DeploymentHubClient> = module.client();
///
/// let tenants = hub.accessible_tenants("jane@example.com").await?;
/// let deployments = hub.list_deployments("jane@example.com").await?;
/// ```
#[async_trait]
pub trait DeploymentHubClient: Send + Sync {
    /// List deployments across every tenant the caller may act on.
    ///
    /// Tenants without credentials, whose token exchange fails, or whose API
    /// call fails are left out of the result. They never make the whole call
    /// fail.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the caller is unknown to the user directory
    /// - `TeamNotFound` if the caller's assigned team does not exist
    /// - `CredentialsNotConfigured` / `CredentialsMalformed` if the tenant
    ///   credential source cannot be loaded
    /// - `DirectoryUnavailable` if a directory lookup fails
    async fn list_deployments(
        &self,
        email: &str,
    ) -> Result<AggregatedDeployments, DeploymentHubError>;

    /// Create a deployment on the caller's own team.
    ///
    /// The request is validated before any lookup or network call.
    ///
    /// # Errors
    ///
    /// - `InvalidDeploymentRequest` if both or neither configuration inputs are set
    /// - `UserNotFound`, `UserNotAssignedToTeam`, `TeamNotFound`
    /// - `TeamCredentialsNotFound` if the caller's team has no credentials
    /// - `TokenAcquisitionFailed` if the OAuth exchange fails
    /// - `ConfigurationCreationFailed` if the inline configuration is rejected
    /// - `DeploymentCreationFailed` if the deployment call is rejected
    async fn create_deployment(
        &self,
        email: &str,
        request: &CreateDeploymentRequest,
    ) -> Result<CreatedDeployment, DeploymentHubError>;

    /// Tenant names the caller may act on, in resolution order.
    ///
    /// Credentials are not consulted, so the list may include tenants that
    /// [`list_deployments`](Self::list_deployments) would skip.
    ///
    /// # Errors
    ///
    /// - `UserNotFound`, `TeamNotFound`, `DirectoryUnavailable`
    async fn accessible_tenants(&self, email: &str) -> Result<Vec<String>, DeploymentHubError>;
}
