//! Fan-out of deployment listing across tenants.

use std::sync::Arc;

use deployment_hub_sdk::{AggregatedDeployments, TenantDeployments};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use super::credentials::{CredentialStore, CredentialsError};
use super::error::DomainError;
use super::ports::TenantApi;
use super::team_resolver::TenantSet;
use super::token_cache::TokenCache;

/// Lists deployments on every tenant of a set and merges the answers.
///
/// A tenant that has no credential, whose token exchange fails, or whose API
/// call fails is left out of the result.
pub struct DeploymentAggregator {
    credentials: Arc<CredentialStore>,
    tokens: Arc<TokenCache>,
    api: Arc<dyn TenantApi>,
}

impl DeploymentAggregator {
    #[must_use]
    pub fn new(
        credentials: Arc<CredentialStore>,
        tokens: Arc<TokenCache>,
        api: Arc<dyn TenantApi>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            api,
        }
    }

    /// Query every tenant concurrently. Entries keep the order of `tenants`.
    ///
    /// # Errors
    ///
    /// `Credentials` if the credential source cannot be loaded. Per-tenant
    /// failures never surface.
    #[instrument(skip_all, fields(tenants = tenants.len()))]
    pub async fn list(&self, tenants: &TenantSet) -> Result<AggregatedDeployments, DomainError> {
        if tenants.is_empty() {
            return Ok(AggregatedDeployments::default());
        }
        self.credentials.load().await?;

        let results = join_all(tenants.iter().map(|tenant| self.list_tenant(tenant))).await;
        let aggregated =
            AggregatedDeployments::from_tenants(results.into_iter().flatten().collect());

        debug!(
            answered = aggregated.tenants.len(),
            total = aggregated.total,
            "deployments aggregated"
        );
        Ok(aggregated)
    }

    async fn list_tenant(&self, tenant: &str) -> Option<TenantDeployments> {
        let credential = match self.credentials.get(tenant).await {
            Ok(credential) => credential,
            Err(CredentialsError::TeamNotFound { .. }) => {
                debug!(tenant, "no credentials, tenant skipped");
                return None;
            }
            Err(e) => {
                warn!(tenant, error = %e, "credential lookup failed, tenant skipped");
                return None;
            }
        };

        let token = match self.tokens.get_token(&credential).await {
            Ok(token) => token,
            Err(e) => {
                warn!(tenant, error = %e, "tenant skipped");
                return None;
            }
        };

        match self.api.list_deployments(&credential, &token).await {
            Ok(page) => Some(TenantDeployments {
                tenant: tenant.to_owned(),
                count: page.count,
                deployments: page.deployments,
            }),
            Err(e) => {
                if e.is_unauthorized() {
                    self.tokens.invalidate(tenant);
                }
                warn!(tenant, error = %e, "deployment listing failed, tenant skipped");
                None
            }
        }
    }
}
