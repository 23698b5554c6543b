pub mod credential_source;
pub mod http;
pub mod oauth;
pub mod static_directory;
pub mod tenant_api;

pub use credential_source::{EnvCredentialSource, InlineCredentialSource};
pub use oauth::ClientCredentialsExchange;
pub use static_directory::StaticDirectory;
pub use tenant_api::HttpTenantApi;
