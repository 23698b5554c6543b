//! Where the tenant credential blob comes from.

use crate::domain::ports::CredentialSource;

/// Reads the credential JSON from an environment variable.
pub struct EnvCredentialSource {
    var: String,
}

impl EnvCredentialSource {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredentialSource {
    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }

    fn read(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Credential JSON given inline in configuration.
pub struct InlineCredentialSource {
    json: String,
}

impl InlineCredentialSource {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl CredentialSource for InlineCredentialSource {
    fn describe(&self) -> String {
        "inline credentials_json".to_owned()
    }

    fn read(&self) -> Option<String> {
        Some(self.json.clone())
    }
}
