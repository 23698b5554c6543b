//! Deployment hub module wiring.

use std::sync::Arc;

use anyhow::Context;
use deployment_hub_sdk::{DeploymentHubClient, DeploymentHubError, TeamDirectory, UserDirectory};
use tracing::info;

use crate::config::DeploymentHubConfig;
use crate::domain::aggregator::DeploymentAggregator;
use crate::domain::creator::DeploymentCreator;
use crate::domain::ports::{CredentialSource, TenantApi, TokenSource};
use crate::domain::team_resolver::TeamResolver;
use crate::domain::{
    CredentialStore, DeploymentHubLocalClient, Service, TokenCache, TokenCacheSettings,
};
use crate::infra::http::build_client;
use crate::infra::{
    ClientCredentialsExchange, EnvCredentialSource, HttpTenantApi, InlineCredentialSource,
};

/// Outbound ports of the module. `init` fills them with the HTTP adapters.
pub struct Ports {
    pub credentials: Arc<dyn CredentialSource>,
    pub tokens: Arc<dyn TokenSource>,
    pub tenant_api: Arc<dyn TenantApi>,
}

/// Deployment hub module.
///
/// Owns the process-wide credential store and token cache, and hands out the
/// public client.
pub struct DeploymentHubModule {
    service: Arc<Service>,
    client: Arc<dyn DeploymentHubClient>,
}

impl DeploymentHubModule {
    /// Wire the module with reqwest-backed OAuth and tenant API adapters.
    ///
    /// Credentials are not read here. They load on first use, or through
    /// [`preload_credentials`](Self::preload_credentials).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn init(
        cfg: &DeploymentHubConfig,
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
    ) -> anyhow::Result<Self> {
        info!("Initializing deployment_hub module");

        let credentials: Arc<dyn CredentialSource> = match &cfg.credentials_json {
            Some(json) => Arc::new(InlineCredentialSource::new(json.as_str())),
            None => Arc::new(EnvCredentialSource::new(cfg.credentials_env.as_str())),
        };

        let http = build_client(cfg).context("failed to build outbound HTTP client")?;
        let ports = Ports {
            credentials,
            tokens: Arc::new(ClientCredentialsExchange::new(
                http.clone(),
                cfg.token_auth_method,
            )),
            tenant_api: Arc::new(HttpTenantApi::new(
                http,
                cfg.resource_group_header.as_str(),
            )),
        };

        Ok(Self::with_ports(cfg, users, teams, ports))
    }

    /// Wire the module over caller-supplied ports.
    #[must_use]
    pub fn with_ports(
        cfg: &DeploymentHubConfig,
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
        ports: Ports,
    ) -> Self {
        let store = Arc::new(CredentialStore::new(ports.credentials));
        let cache = Arc::new(TokenCache::new(
            ports.tokens,
            TokenCacheSettings {
                refresh_margin: cfg.token_refresh_margin(),
                default_ttl: cfg.default_token_ttl(),
            },
        ));

        let service = Arc::new(Service::new(
            TeamResolver::new(users, teams, cfg.supplemental_tenants_key.as_str()),
            store.clone(),
            DeploymentAggregator::new(store.clone(), cache.clone(), ports.tenant_api.clone()),
            DeploymentCreator::new(store, cache, ports.tenant_api),
        ));
        let client: Arc<dyn DeploymentHubClient> =
            Arc::new(DeploymentHubLocalClient::new(service.clone()));

        Self { service, client }
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn DeploymentHubClient> {
        Arc::clone(&self.client)
    }

    /// Load tenant credentials now instead of on first request.
    ///
    /// Returns the credentialed tenant names, sorted.
    ///
    /// # Errors
    ///
    /// `CredentialsNotConfigured` or `CredentialsMalformed`.
    pub async fn preload_credentials(&self) -> Result<Vec<String>, DeploymentHubError> {
        let teams = self.service.credentialed_tenants().await?;
        info!(tenants = teams.len(), "tenant credentials preloaded");
        Ok(teams)
    }
}
