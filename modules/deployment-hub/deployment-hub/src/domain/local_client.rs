//! Local (in-process) client for the deployment hub.

use std::sync::Arc;

use async_trait::async_trait;
use deployment_hub_sdk::{
    AggregatedDeployments, CreateDeploymentRequest, CreatedDeployment, DeploymentHubClient,
    DeploymentHubError,
};

use super::{DomainError, Service};

/// Local client wrapping the domain service.
///
/// Handed out by the module as `Arc<dyn DeploymentHubClient>`.
pub struct DeploymentHubLocalClient {
    svc: Arc<Service>,
}

impl DeploymentHubLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> DeploymentHubError {
    match e {
        DomainError::InvalidDeploymentRequest(_)
        | DomainError::UserNotFound { .. }
        | DomainError::UserNotAssignedToTeam { .. } => {
            tracing::debug!(operation = op, error = %e, "deployment_hub call rejected");
        }
        _ => {
            tracing::error!(operation = op, error = ?e, "deployment_hub call failed");
        }
    }
    e.into()
}

#[async_trait]
impl DeploymentHubClient for DeploymentHubLocalClient {
    async fn list_deployments(
        &self,
        email: &str,
    ) -> Result<AggregatedDeployments, DeploymentHubError> {
        self.svc
            .list_deployments(email)
            .await
            .map_err(|e| log_and_convert("list_deployments", e))
    }

    async fn create_deployment(
        &self,
        email: &str,
        request: &CreateDeploymentRequest,
    ) -> Result<CreatedDeployment, DeploymentHubError> {
        self.svc
            .create_deployment(email, request)
            .await
            .map_err(|e| log_and_convert("create_deployment", e))
    }

    async fn accessible_tenants(&self, email: &str) -> Result<Vec<String>, DeploymentHubError> {
        self.svc
            .accessible_tenants(email)
            .await
            .map_err(|e| log_and_convert("accessible_tenants", e))
    }
}
