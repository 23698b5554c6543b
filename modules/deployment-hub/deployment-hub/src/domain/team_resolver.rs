//! Resolution of the tenants a caller may act on.

use std::sync::Arc;

use deployment_hub_sdk::{Role, TeamDirectory, TeamRecord, UserDirectory, UserRecord};
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::error::DomainError;

/// The authenticated caller, as far as tenant resolution is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub email: String,
    pub team_id: Option<Uuid>,
    pub role: Role,
    pub group_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    /// Extra tenant names granted through user metadata.
    pub supplemental_tenants: Vec<String>,
}

impl CallerIdentity {
    /// Build the identity from a directory record, reading supplemental
    /// tenant names from `metadata[supplemental_key]`.
    #[must_use]
    pub fn from_record(user: UserRecord, supplemental_key: &str) -> Self {
        let supplemental_tenants = supplemental_tenants(&user.metadata, supplemental_key);
        Self {
            email: user.email,
            team_id: user.team_id,
            role: user.role,
            group_id: user.group_id,
            organization_id: user.organization_id,
            supplemental_tenants,
        }
    }
}

/// Tenant names in resolution order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantSet(Vec<String>);

impl TenantSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless it is already present. Returns whether it was added.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.0.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a TenantSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for TenantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Supplemental tenant names listed under `key` in a user's metadata.
///
/// The metadata may be a JSON object or a string holding a JSON object.
/// Anything under `key` that is not a non-blank string is ignored.
#[must_use]
pub fn supplemental_tenants(metadata: &Value, key: &str) -> Vec<String> {
    let parsed;
    let object = match metadata {
        Value::Object(map) => map,
        Value::String(raw) => {
            parsed = serde_json::from_str::<Value>(raw).unwrap_or(Value::Null);
            match &parsed {
                Value::Object(map) => map,
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    let Some(Value::Array(entries)) = object.get(key) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Computes which tenants a caller may act on.
pub struct TeamResolver {
    users: Arc<dyn UserDirectory>,
    teams: Arc<dyn TeamDirectory>,
    supplemental_key: String,
}

impl TeamResolver {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        teams: Arc<dyn TeamDirectory>,
        supplemental_key: impl Into<String>,
    ) -> Self {
        Self {
            users,
            teams,
            supplemental_key: supplemental_key.into(),
        }
    }

    /// Look the caller up by verified email.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the directory has no such user
    /// - `Directory` if the lookup fails
    pub async fn identify(&self, email: &str) -> Result<CallerIdentity, DomainError> {
        let user = self
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserNotFound {
                email: email.to_owned(),
            })?;
        Ok(CallerIdentity::from_record(user, &self.supplemental_key))
    }

    /// Every tenant the caller may act on.
    ///
    /// Managers get the teams of their organization, or of their group when
    /// they have no assigned team and a group is known. Members get their own team. Supplemental names are
    /// appended for both. An empty set is not an error.
    ///
    /// # Errors
    ///
    /// - `TeamNotFound` if an assigned team id does not exist
    /// - `Directory` if a lookup fails
    #[instrument(skip_all, fields(email = %caller.email))]
    pub async fn resolve(&self, caller: &CallerIdentity) -> Result<TenantSet, DomainError> {
        let mut tenants = TenantSet::new();

        match caller.role {
            Role::Manager => {
                for team in self.managed_teams(caller).await? {
                    tenants.insert(team.tenant_name());
                }
            }
            Role::Member => {
                if let Some(team_id) = caller.team_id {
                    tenants.insert(self.team(team_id).await?.tenant_name());
                }
            }
        }

        for name in &caller.supplemental_tenants {
            tenants.insert(name.as_str());
        }

        debug!(tenants = tenants.len(), "tenants resolved");
        Ok(tenants)
    }

    /// The caller's own tenant, the only target of single-tenant writes.
    ///
    /// # Errors
    ///
    /// - `UserNotAssignedToTeam` if the caller has no assigned team,
    ///   whatever their role or supplemental grants
    /// - `TeamNotFound` if the assigned team does not exist
    /// - `Directory` if the lookup fails
    pub async fn primary_tenant(&self, caller: &CallerIdentity) -> Result<String, DomainError> {
        let team_id = caller
            .team_id
            .ok_or_else(|| DomainError::UserNotAssignedToTeam {
                email: caller.email.clone(),
            })?;
        Ok(self.team(team_id).await?.tenant_name().to_owned())
    }

    async fn managed_teams(&self, caller: &CallerIdentity) -> Result<Vec<TeamRecord>, DomainError> {
        // The group scopes a manager only when they have no team of their own.
        if let (None, Some(group_id)) = (caller.team_id, caller.group_id) {
            return Ok(self.teams.get_by_group_id(group_id).await?);
        }
        if let Some(organization_id) = caller.organization_id {
            return Ok(self.teams.get_by_organization_id(organization_id).await?);
        }
        // Neither scope known: fall back to the manager's own team.
        match caller.team_id {
            Some(team_id) => Ok(vec![self.team(team_id).await?]),
            None => Ok(Vec::new()),
        }
    }

    async fn team(&self, id: Uuid) -> Result<TeamRecord, DomainError> {
        self.teams
            .get_by_id(id)
            .await?
            .ok_or(DomainError::TeamNotFound { id })
    }
}
