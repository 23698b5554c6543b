//! Deployment Hub SDK
//!
//! This crate provides the public API for the `deployment-hub` module:
//!
//! - [`DeploymentHubClient`] - Public API trait for consumers
//! - [`UserDirectory`], [`TeamDirectory`] - Lookup ports the hosting
//!   application implements over its user/team storage
//! - [`Deployment`], [`AggregatedDeployments`], [`CreateDeploymentRequest`] - Models
//! - [`DeploymentHubError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use deployment_hub_sdk::{CreateDeploymentRequest, DeploymentHubClient};
//!
//! // Every deployment visible to the caller, merged across their teams
//! let all = hub.list_deployments("jane@example.com").await?;
//! for entry in &all.tenants {
//!     println!("{}: {} deployments", entry.tenant, entry.count);
//! }
//!
//! // Create a deployment on the caller's own team
//! let request = CreateDeploymentRequest::from_configuration_id("cfg-42", Some("2h".into()));
//! let created = hub.create_deployment("jane@example.com", &request).await?;
//! ```

pub mod api;
pub mod directory;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::DeploymentHubClient;
pub use directory::{DirectoryError, Role, TeamDirectory, TeamRecord, UserDirectory, UserRecord};
pub use error::DeploymentHubError;
pub use models::{
    AggregatedDeployments, ConfigurationRequest, CreateDeploymentRequest, CreatedDeployment,
    Deployment, DeploymentStatus, ParameterBinding, TenantDeployments,
};
