//! Error types for the deployment hub module.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when using the deployment hub API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentHubError {
    /// The tenant credential source is absent or empty.
    #[error("tenant credentials are not configured")]
    CredentialsNotConfigured,

    /// The tenant credential source is not a valid credential list.
    #[error("tenant credentials are malformed: {message}")]
    CredentialsMalformed {
        /// The underlying parse error.
        message: String,
    },

    /// No credential record exists for the requested team.
    #[error("credentials not found for team '{team}'")]
    TeamCredentialsNotFound {
        /// The team (tenant) name that was looked up.
        team: String,
    },

    /// The OAuth client-credentials exchange failed for a team.
    #[error("token acquisition failed for team '{team}': {cause}")]
    TokenAcquisitionFailed {
        /// The team (tenant) name.
        team: String,
        /// What went wrong. Never contains secrets.
        cause: String,
    },

    /// The caller is unknown to the user directory.
    #[error("user not found: {email}")]
    UserNotFound {
        /// The caller's email.
        email: String,
    },

    /// The operation needs the caller's own team and the caller has none.
    #[error("user {email} is not assigned to a team")]
    UserNotAssignedToTeam {
        /// The caller's email.
        email: String,
    },

    /// A team referenced by the caller does not exist.
    #[error("team not found: {id}")]
    TeamNotFound {
        /// The missing team id.
        id: Uuid,
    },

    /// The deployment request failed validation.
    #[error("invalid deployment request: {0}")]
    InvalidDeploymentRequest(String),

    /// The tenant rejected the inline configuration.
    #[error("configuration creation failed: {cause}")]
    ConfigurationCreationFailed {
        /// What went wrong.
        cause: String,
    },

    /// The tenant rejected the deployment.
    #[error("deployment creation failed for team '{team}': {cause}")]
    DeploymentCreationFailed {
        /// The team (tenant) name.
        team: String,
        /// What went wrong.
        cause: String,
    },

    /// The user or team directory could not be queried.
    #[error("directory unavailable: {0}")]
    DirectoryUnavailable(String),
}
