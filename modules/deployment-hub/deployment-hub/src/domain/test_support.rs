//! Hand-written port doubles shared by the domain tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use deployment_hub_sdk::{
    ConfigurationRequest, CreatedDeployment, Deployment, DeploymentStatus,
};
use secrecy::{ExposeSecret, SecretString};

use super::credentials::{CredentialStore, TenantCredential};
use super::ports::{
    CreatedConfiguration, CredentialSource, DeploymentPage, IssuedToken, TenantApi,
    TenantApiError, TokenSource, TokenSourceError,
};
use super::token_cache::{TokenCache, TokenCacheSettings};

pub struct StaticSource(pub Option<String>);

impl CredentialSource for StaticSource {
    fn describe(&self) -> String {
        "inline test credentials".to_owned()
    }

    fn read(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Credential JSON with one record per team, `api_url` = `https://<team>.example.com`.
pub fn credentials_json(teams: &[&str]) -> String {
    let records: Vec<serde_json::Value> = teams
        .iter()
        .map(|team| {
            serde_json::json!({
                "team": team,
                "clientId": format!("{team}-client"),
                "clientSecret": format!("{team}-secret"),
                "oauthUrl": format!("https://auth.{team}.example.com/oauth/token"),
                "apiUrl": format!("https://{team}.example.com/v2/lm"),
                "resourceGroup": "default",
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}

pub fn store(teams: &[&str]) -> Arc<CredentialStore> {
    Arc::new(CredentialStore::new(Arc::new(StaticSource(Some(
        credentials_json(teams),
    )))))
}

/// Issues `token-<team>` for every team except those listed as failing.
#[derive(Default)]
pub struct ScriptedTokens {
    pub failing: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedTokens {
    pub fn failing(teams: &[&str]) -> Self {
        Self {
            failing: teams.iter().map(|t| (*t).to_owned()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for ScriptedTokens {
    async fn fetch_token(
        &self,
        credential: &TenantCredential,
    ) -> Result<IssuedToken, TokenSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&credential.team) {
            return Err(TokenSourceError::Status { status: 401 });
        }
        Ok(IssuedToken {
            access_token: SecretString::from(format!("token-{}", credential.team)),
            expires_in: Some(Duration::from_secs(3600)),
        })
    }
}

pub fn token_cache(source: Arc<ScriptedTokens>) -> Arc<TokenCache> {
    Arc::new(TokenCache::new(source, TokenCacheSettings::default()))
}

pub fn deployment(id: &str, status: DeploymentStatus) -> Deployment {
    Deployment {
        id: id.to_owned(),
        configuration_id: Some(format!("cfg-{id}")),
        status,
        status_message: None,
        deployment_url: None,
        created_at: None,
        modified_at: None,
    }
}

/// Tenant API answering from per-team scripts and recording every call as
/// `"<op>:<team>"`. Teams without a script answer HTTP 500.
#[derive(Default)]
pub struct ScriptedTenantApi {
    pub lists: HashMap<String, Result<DeploymentPage, u16>>,
    pub configurations: HashMap<String, Result<CreatedConfiguration, u16>>,
    pub deployments: HashMap<String, Result<CreatedDeployment, u16>>,
    /// Per-team delay applied before a list answer.
    pub list_delays: HashMap<String, Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedTenantApi {
    pub fn with_list(mut self, team: &str, deployments: Vec<Deployment>) -> Self {
        let count = deployments.len() as u64;
        self.lists
            .insert(team.to_owned(), Ok(DeploymentPage { count, deployments }));
        self
    }

    pub fn with_list_status(mut self, team: &str, status: u16) -> Self {
        self.lists.insert(team.to_owned(), Err(status));
        self
    }

    pub fn with_list_delay(mut self, team: &str, delay: Duration) -> Self {
        self.list_delays.insert(team.to_owned(), delay);
        self
    }

    pub fn with_configuration(mut self, team: &str, result: Result<&str, u16>) -> Self {
        let result = result.map(|id| CreatedConfiguration {
            id: id.to_owned(),
            message: Some("Configuration created".to_owned()),
        });
        self.configurations.insert(team.to_owned(), result);
        self
    }

    pub fn with_deployment(mut self, team: &str, result: Result<&str, u16>) -> Self {
        let result = result.map(|id| CreatedDeployment {
            id: id.to_owned(),
            message: Some("Deployment scheduled.".to_owned()),
            deployment_url: None,
            status: Some(DeploymentStatus::Pending),
            ttl: None,
        });
        self.deployments.insert(team.to_owned(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn scripted<T: Clone>(
    script: &HashMap<String, Result<T, u16>>,
    team: &str,
) -> Result<T, TenantApiError> {
    match script.get(team) {
        Some(Ok(value)) => Ok(value.clone()),
        Some(Err(status)) => Err(TenantApiError::Status {
            status: *status,
            body: "scripted failure".to_owned(),
        }),
        None => Err(TenantApiError::Status {
            status: 500,
            body: "no script".to_owned(),
        }),
    }
}

#[async_trait]
impl TenantApi for ScriptedTenantApi {
    async fn list_deployments(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
    ) -> Result<DeploymentPage, TenantApiError> {
        assert_eq!(token.expose_secret(), format!("token-{}", credential.team));
        self.record(format!("list:{}", credential.team));
        if let Some(delay) = self.list_delays.get(&credential.team) {
            tokio::time::sleep(*delay).await;
        }
        scripted(&self.lists, &credential.team)
    }

    async fn create_configuration(
        &self,
        credential: &TenantCredential,
        _token: &SecretString,
        _request: &ConfigurationRequest,
    ) -> Result<CreatedConfiguration, TenantApiError> {
        self.record(format!("configuration:{}", credential.team));
        scripted(&self.configurations, &credential.team)
    }

    async fn create_deployment(
        &self,
        credential: &TenantCredential,
        _token: &SecretString,
        configuration_id: &str,
        ttl: Option<&str>,
    ) -> Result<CreatedDeployment, TenantApiError> {
        self.record(format!("deployment:{}:{configuration_id}", credential.team));
        scripted(&self.deployments, &credential.team).map(|mut created| {
            created.ttl = ttl.map(str::to_owned);
            created
        })
    }
}
