//! `OAuth2` client-credentials exchange against a tenant's token endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::ClientAuthMethod;
use crate::domain::TenantCredential;
use crate::domain::ports::{IssuedToken, TokenSource, TokenSourceError};

use super::http::describe_send_error;

/// Token endpoint response.
///
/// `Deserialize` only, so the access token cannot be serialized into logs.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    /// Must be `Bearer` if present.
    #[serde(default)]
    token_type: Option<String>,
}

/// Exchanges a tenant's client id and secret for a bearer token.
pub struct ClientCredentialsExchange {
    client: reqwest::Client,
    auth_method: ClientAuthMethod,
}

impl ClientCredentialsExchange {
    #[must_use]
    pub fn new(client: reqwest::Client, auth_method: ClientAuthMethod) -> Self {
        Self {
            client,
            auth_method,
        }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsExchange {
    #[instrument(skip_all, fields(team = %credential.team))]
    async fn fetch_token(
        &self,
        credential: &TenantCredential,
    ) -> Result<IssuedToken, TokenSourceError> {
        let mut fields: Vec<(&str, &str)> = vec![("grant_type", "client_credentials")];
        let mut builder = self.client.post(&credential.oauth_url);

        match self.auth_method {
            ClientAuthMethod::Basic => {
                builder = builder.basic_auth(
                    &credential.client_id,
                    Some(credential.client_secret.expose_secret()),
                );
            }
            ClientAuthMethod::Form => {
                fields.push(("client_id", &credential.client_id));
                fields.push(("client_secret", credential.client_secret.expose_secret()));
            }
        }

        let response = builder
            .form(&fields)
            .send()
            .await
            .map_err(|e| TokenSourceError::Http(describe_send_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            // The body of a rejected exchange may echo credentials; keep only the status.
            return Err(TokenSourceError::Status {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenSourceError::InvalidResponse(e.to_string()))?;

        if let Some(ref tt) = token.token_type
            && !tt.eq_ignore_ascii_case("bearer")
        {
            return Err(TokenSourceError::UnsupportedTokenType(tt.clone()));
        }
        if token.access_token.is_empty() {
            return Err(TokenSourceError::InvalidResponse(
                "empty access_token".to_owned(),
            ));
        }

        debug!(expires_in = ?token.expires_in, "token issued");
        Ok(IssuedToken {
            access_token: SecretString::from(token.access_token),
            expires_in: token.expires_in.map(Duration::from_secs),
        })
    }
}
