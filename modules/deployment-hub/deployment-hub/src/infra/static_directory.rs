//! Config-backed user and team directory.

use std::collections::HashMap;

use async_trait::async_trait;
use deployment_hub_sdk::{DirectoryError, TeamDirectory, TeamRecord, UserDirectory, UserRecord};
use uuid::Uuid;

use crate::config::StaticDirectoryConfig;

/// In-memory directory loaded from configuration.
///
/// Emails match case-insensitively. Team listings keep configuration order.
pub struct StaticDirectory {
    users: HashMap<String, UserRecord>,
    teams: Vec<TeamRecord>,
}

impl StaticDirectory {
    #[must_use]
    pub fn from_config(cfg: &StaticDirectoryConfig) -> Self {
        let users = cfg
            .users
            .iter()
            .map(|u| (u.email.to_lowercase(), u.clone()))
            .collect();
        Self {
            users,
            teams: cfg.teams.clone(),
        }
    }

    fn teams_where(&self, pred: impl Fn(&TeamRecord) -> bool) -> Vec<TeamRecord> {
        self.teams.iter().filter(|t| pred(t)).cloned().collect()
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn get_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.get(&email.to_lowercase()).cloned())
    }
}

#[async_trait]
impl TeamDirectory for StaticDirectory {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<TeamRecord>, DirectoryError> {
        Ok(self.teams.iter().find(|t| t.id == id).cloned())
    }

    async fn get_by_group_id(&self, group_id: Uuid) -> Result<Vec<TeamRecord>, DirectoryError> {
        Ok(self.teams_where(|t| t.group_id == Some(group_id)))
    }

    async fn get_by_organization_id(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<TeamRecord>, DirectoryError> {
        Ok(self.teams_where(|t| t.organization_id == Some(organization_id)))
    }
}
