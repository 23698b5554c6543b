//! Deployment Hub Module
//!
//! Lets one authenticated user query and create ML-platform deployments
//! across every team tenant they are entitled to. Each tenant has its own
//! OAuth client, API base URL and resource group.
//!
//! The public API is `deployment_hub_sdk::DeploymentHubClient`, obtained from
//! [`DeploymentHubModule::client`].

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{ClientAuthMethod, DeploymentHubConfig, StaticDirectoryConfig};
pub use module::{DeploymentHubModule, Ports};
