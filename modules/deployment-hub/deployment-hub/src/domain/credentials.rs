//! Per-team ML-platform credentials.
//!
//! The credential blob is parsed once. Every caller that arrives while the
//! first load is running waits for it and observes the same outcome,
//! including a failure.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::ports::CredentialSource;

/// API credentials of one tenant.
///
/// Immutable once loaded. `client_secret` never shows up in `Debug` output.
#[derive(Debug)]
pub struct TenantCredential {
    /// Tenant name, unique key of the credential set.
    pub team: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub oauth_url: String,
    pub api_url: String,
    pub resource_group: String,
}

/// Credential loading and lookup errors.
///
/// `Clone` so that a failed one-shot load can be handed to every caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("tenant credentials are not configured ({source_name})")]
    NotConfigured { source_name: String },

    #[error("tenant credentials are malformed: {message}")]
    Malformed { message: String },

    #[error("credentials not found for team '{team}'")]
    TeamNotFound { team: String },
}

/// Wire shape of one credential record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRecord {
    team: String,
    #[serde(alias = "clientID")]
    client_id: String,
    client_secret: String,
    #[serde(alias = "oauthURL")]
    oauth_url: String,
    #[serde(alias = "apiURL")]
    api_url: String,
    #[serde(default)]
    resource_group: String,
}

impl From<CredentialRecord> for TenantCredential {
    fn from(r: CredentialRecord) -> Self {
        Self {
            team: r.team,
            client_id: r.client_id,
            client_secret: SecretString::from(r.client_secret),
            oauth_url: r.oauth_url,
            api_url: r.api_url,
            resource_group: r.resource_group,
        }
    }
}

type CredentialIndex = HashMap<String, Arc<TenantCredential>>;

/// Process-wide store of tenant credentials, loaded lazily exactly once.
pub struct CredentialStore {
    source: Arc<dyn CredentialSource>,
    loaded: OnceCell<Result<CredentialIndex, CredentialsError>>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            source,
            loaded: OnceCell::new(),
        }
    }

    /// Load the credential blob if that has not happened yet.
    ///
    /// Returns the number of credentialed teams.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if the source is absent or blank
    /// - `Malformed` if the blob is not a JSON array of credential records
    pub async fn load(&self) -> Result<usize, CredentialsError> {
        self.index().await.map(HashMap::len)
    }

    /// Credentials of `team`, matched exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// - any [`load`](Self::load) error
    /// - `TeamNotFound` if no record carries this team name
    pub async fn get(&self, team: &str) -> Result<Arc<TenantCredential>, CredentialsError> {
        self.index()
            .await?
            .get(team)
            .cloned()
            .ok_or_else(|| CredentialsError::TeamNotFound {
                team: team.to_owned(),
            })
    }

    /// Credentialed team names, sorted.
    ///
    /// # Errors
    ///
    /// Any [`load`](Self::load) error.
    pub async fn teams(&self) -> Result<Vec<String>, CredentialsError> {
        let mut teams: Vec<String> = self.index().await?.keys().cloned().collect();
        teams.sort_unstable();
        Ok(teams)
    }

    async fn index(&self) -> Result<&CredentialIndex, CredentialsError> {
        self.loaded
            .get_or_init(|| async { self.parse() })
            .await
            .as_ref()
            .map_err(Clone::clone)
    }

    fn parse(&self) -> Result<CredentialIndex, CredentialsError> {
        let source_name = self.source.describe();
        let raw = self
            .source
            .read()
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| CredentialsError::NotConfigured {
                source_name: source_name.clone(),
            })?;

        let records: Vec<CredentialRecord> =
            serde_json::from_str(&raw).map_err(|e| CredentialsError::Malformed {
                message: e.to_string(),
            })?;

        let mut index = CredentialIndex::with_capacity(records.len());
        for record in records {
            match index.entry(record.team.clone()) {
                Entry::Occupied(_) => {
                    warn!(team = %record.team, "duplicate credential record ignored");
                }
                Entry::Vacant(slot) => {
                    slot.insert(Arc::new(record.into()));
                }
            }
        }

        info!(source = %source_name, teams = index.len(), "tenant credentials loaded");
        Ok(index)
    }
}
