use std::sync::Arc;

use deployment_hub_sdk::{AggregatedDeployments, CreateDeploymentRequest, CreatedDeployment};
use tracing::instrument;

use super::aggregator::DeploymentAggregator;
use super::creator::{DeploymentCreator, validate_request};
use super::credentials::CredentialStore;
use super::error::DomainError;
use super::team_resolver::TeamResolver;

/// Deployment hub domain service.
///
/// Resolves the caller's tenants, then delegates to the aggregator (reads) or
/// the creator (single-tenant writes).
pub struct Service {
    resolver: TeamResolver,
    credentials: Arc<CredentialStore>,
    aggregator: DeploymentAggregator,
    creator: DeploymentCreator,
}

impl Service {
    #[must_use]
    pub fn new(
        resolver: TeamResolver,
        credentials: Arc<CredentialStore>,
        aggregator: DeploymentAggregator,
        creator: DeploymentCreator,
    ) -> Self {
        Self {
            resolver,
            credentials,
            aggregator,
            creator,
        }
    }

    /// # Errors
    ///
    /// Caller lookup, team resolution and credential loading errors.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn list_deployments(
        &self,
        email: &str,
    ) -> Result<AggregatedDeployments, DomainError> {
        let caller = self.resolver.identify(email).await?;
        let tenants = self.resolver.resolve(&caller).await?;
        self.aggregator.list(&tenants).await
    }

    /// Validates first, then resolves the caller's own tenant and creates the
    /// deployment there.
    ///
    /// # Errors
    ///
    /// Any validation, lookup, credential, token or tenant API error.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn create_deployment(
        &self,
        email: &str,
        request: &CreateDeploymentRequest,
    ) -> Result<CreatedDeployment, DomainError> {
        let source = validate_request(request)?;
        let caller = self.resolver.identify(email).await?;
        let tenant = self.resolver.primary_tenant(&caller).await?;
        self.creator
            .create(&tenant, source, request.ttl.as_deref())
            .await
    }

    /// # Errors
    ///
    /// Caller lookup and team resolution errors.
    pub async fn accessible_tenants(&self, email: &str) -> Result<Vec<String>, DomainError> {
        let caller = self.resolver.identify(email).await?;
        Ok(self.resolver.resolve(&caller).await?.into_vec())
    }

    /// Load tenant credentials now and return the credentialed team names.
    ///
    /// # Errors
    ///
    /// `Credentials` if the source is absent or malformed.
    pub async fn credentialed_tenants(&self) -> Result<Vec<String>, DomainError> {
        Ok(self.credentials.teams().await?)
    }
}
