//! Single-tenant deployment creation.

use std::sync::Arc;

use deployment_hub_sdk::{ConfigurationRequest, CreateDeploymentRequest, CreatedDeployment};
use tracing::{info, instrument};

use super::credentials::CredentialStore;
use super::error::DomainError;
use super::ports::{TenantApi, TenantApiError};
use super::token_cache::TokenCache;

/// Where the deployment's configuration comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationSource<'a> {
    /// A configuration that already exists on the tenant.
    Existing(&'a str),
    /// A configuration to create first.
    Inline(&'a ConfigurationRequest),
}

/// Check that exactly one configuration input is set.
///
/// A blank `configuration_id` counts as absent.
///
/// # Errors
///
/// `InvalidDeploymentRequest` if both or neither are set.
pub fn validate_request(
    request: &CreateDeploymentRequest,
) -> Result<ConfigurationSource<'_>, DomainError> {
    let configuration_id = request
        .configuration_id
        .as_deref()
        .filter(|id| !id.trim().is_empty());

    match (configuration_id, request.configuration_request.as_ref()) {
        (Some(_), Some(_)) => Err(DomainError::invalid_request(
            "configurationId and configurationRequest cannot both be provided",
        )),
        (None, None) => Err(DomainError::invalid_request(
            "either configurationId or configurationRequest must be provided",
        )),
        (Some(id), None) => Ok(ConfigurationSource::Existing(id)),
        (None, Some(inline)) => Ok(ConfigurationSource::Inline(inline)),
    }
}

/// Creates deployments on exactly one tenant, surfacing every failure.
pub struct DeploymentCreator {
    credentials: Arc<CredentialStore>,
    tokens: Arc<TokenCache>,
    api: Arc<dyn TenantApi>,
}

impl DeploymentCreator {
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

    /// Create a deployment on `tenant`, creating the configuration first when
    /// it is given inline.
    ///
    /// # Errors
    ///
    /// - `Credentials` if the tenant has no credentials or they cannot be loaded
    /// - `TokenAcquisitionFailed` if the OAuth exchange fails
    /// - `ConfigurationCreationFailed` if the inline configuration is rejected;
    ///   no deployment call is made then
    /// - `DeploymentCreationFailed` if the deployment call is rejected
    #[instrument(skip_all, fields(tenant = %tenant))]
    pub async fn create(
        &self,
        tenant: &str,
        source: ConfigurationSource<'_>,
        ttl: Option<&str>,
    ) -> Result<CreatedDeployment, DomainError> {
        let credential = self.credentials.get(tenant).await?;
        let token = self.tokens.get_token(&credential).await?;

        let configuration_id = match source {
            ConfigurationSource::Existing(id) => id.to_owned(),
            ConfigurationSource::Inline(request) => {
                let created = self
                    .api
                    .create_configuration(&credential, &token, request)
                    .await
                    .map_err(|cause| {
                        self.drop_token_if_rejected(tenant, &cause);
                        DomainError::ConfigurationCreationFailed { cause }
                    })?;
                info!(
                    configuration_id = %created.id,
                    tenant_message = created.message.as_deref().unwrap_or_default(),
                    "configuration created"
                );
                created.id
            }
        };

        let created = self
            .api
            .create_deployment(&credential, &token, &configuration_id, ttl)
            .await
            .map_err(|cause| {
                self.drop_token_if_rejected(tenant, &cause);
                DomainError::DeploymentCreationFailed {
                    team: tenant.to_owned(),
                    cause,
                }
            })?;

        info!(deployment_id = %created.id, %configuration_id, "deployment created");
        Ok(created)
    }

    fn drop_token_if_rejected(&self, tenant: &str, cause: &TenantApiError) {
        if cause.is_unauthorized() {
            self.tokens.invalidate(tenant);
        }
    }
}
