//! Domain layer for the deployment hub.

pub mod aggregator;
pub mod creator;
pub mod credentials;
pub mod error;
pub mod local_client;
pub mod ports;
pub mod service;
pub mod team_resolver;
pub mod token_cache;

#[cfg(test)]
mod test_support;

pub use credentials::{CredentialStore, CredentialsError, TenantCredential};
pub use error::DomainError;
pub use local_client::DeploymentHubLocalClient;
pub use service::Service;
pub use team_resolver::{CallerIdentity, TenantSet};
pub use token_cache::{TokenCache, TokenCacheSettings};
