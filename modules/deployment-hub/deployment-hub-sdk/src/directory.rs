//! Lookup ports over the hosting application's user and team storage.
//!
//! The deployment hub only reads these relationships. The hosting
//! application implements both traits on top of whatever repositories it
//! already has.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Role of a user within their organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    /// Sees every team of their group or organization.
    Manager,
}

/// A user as stored by the hosting application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub team_id: Option<Uuid>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Free-form metadata. May carry supplemental tenant names.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A team as stored by the hosting application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: Uuid,
    pub name: String,
    /// Tenant name of the team on the ML platform.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub organization_id: Option<Uuid>,
}

impl TeamRecord {
    /// Tenant name of this team: `owner` when set, the team name otherwise.
    #[must_use]
    pub fn tenant_name(&self) -> &str {
        match self.owner.as_deref() {
            Some(owner) if !owner.trim().is_empty() => owner,
            _ => &self.name,
        }
    }
}

/// Failure of a directory backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory backend unavailable: {0}")]
    Unavailable(String),
}

/// User lookup by verified email.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the backend cannot be queried. An unknown
    /// email is `Ok(None)`.
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// Team lookups.
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the backend cannot be queried. An unknown
    /// id is `Ok(None)`.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<TeamRecord>, DirectoryError>;

    /// Teams of a group, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the backend cannot be queried.
    async fn get_by_group_id(&self, group_id: Uuid) -> Result<Vec<TeamRecord>, DirectoryError>;

    /// Teams of an organization, in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the backend cannot be queried.
    async fn get_by_organization_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<TeamRecord>, DirectoryError>;
}
