//! Domain errors for the deployment hub.

use deployment_hub_sdk::{DeploymentHubError, DirectoryError};
use thiserror::Error;
use uuid::Uuid;

use super::credentials::CredentialsError;
use super::ports::{TenantApiError, TokenSourceError};

/// Domain-level errors for deployment hub operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Credential source or lookup failure.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// OAuth exchange failed for a team.
    #[error("token acquisition failed for team '{team}': {cause}")]
    TokenAcquisitionFailed {
        team: String,
        #[source]
        cause: TokenSourceError,
    },

    #[error("user not found: {email}")]
    UserNotFound { email: String },

    #[error("user {email} is not assigned to a team")]
    UserNotAssignedToTeam { email: String },

    #[error("team not found: {id}")]
    TeamNotFound { id: Uuid },

    /// Request rejected before any I/O.
    #[error("invalid deployment request: {0}")]
    InvalidDeploymentRequest(String),

    /// Tenant rejected the inline configuration.
    #[error("configuration creation failed: {cause}")]
    ConfigurationCreationFailed {
        #[source]
        cause: TenantApiError,
    },

    /// Tenant rejected the deployment.
    #[error("deployment creation failed for team '{team}': {cause}")]
    DeploymentCreationFailed {
        team: String,
        #[source]
        cause: TenantApiError,
    },

    /// User or team directory failure.
    #[error("directory lookup failed: {0}")]
    Directory(#[from] DirectoryError),
}

impl DomainError {
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidDeploymentRequest(message.into())
    }
}

/// Convert `DomainError` to SDK `DeploymentHubError`.
impl From<DomainError> for DeploymentHubError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Credentials(CredentialsError::NotConfigured { .. }) => {
                Self::CredentialsNotConfigured
            }
            DomainError::Credentials(CredentialsError::Malformed { message }) => {
                Self::CredentialsMalformed { message }
            }
            DomainError::Credentials(CredentialsError::TeamNotFound { team }) => {
                Self::TeamCredentialsNotFound { team }
            }
            DomainError::TokenAcquisitionFailed { team, cause } => Self::TokenAcquisitionFailed {
                team,
                cause: cause.to_string(),
            },
            DomainError::UserNotFound { email } => Self::UserNotFound { email },
            DomainError::UserNotAssignedToTeam { email } => Self::UserNotAssignedToTeam { email },
            DomainError::TeamNotFound { id } => Self::TeamNotFound { id },
            DomainError::InvalidDeploymentRequest(message) => {
                Self::InvalidDeploymentRequest(message)
            }
            DomainError::ConfigurationCreationFailed { cause } => {
                Self::ConfigurationCreationFailed {
                    cause: cause.to_string(),
                }
            }
            DomainError::DeploymentCreationFailed { team, cause } => {
                Self::DeploymentCreationFailed {
                    team,
                    cause: cause.to_string(),
                }
            }
            DomainError::Directory(DirectoryError::Unavailable(message)) => {
                Self::DirectoryUnavailable(message)
            }
        }
    }
}
