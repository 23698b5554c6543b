//! Per-tenant bearer token cache.
//!
//! Entries are keyed by tenant name, never by client id, so two tenants that
//! share an OAuth client still hold separate tokens. The map lock is never
//! held across the OAuth exchange: a miss releases the shard, exchanges, then
//! inserts. A failed or cancelled exchange leaves the previous entry as is.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use secrecy::SecretString;
use tokio::time::Instant;
use tracing::{debug, instrument};

use super::credentials::TenantCredential;
use super::error::DomainError;
use super::ports::TokenSource;

/// Upper bound on a token lifetime, whatever the OAuth endpoint claims.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Timing policy of the cache.
#[derive(Debug, Clone, Copy)]
pub struct TokenCacheSettings {
    /// How long before expiry a token stops being served.
    /// Capped at half of the token lifetime.
    pub refresh_margin: Duration,
    /// Lifetime used when the OAuth response has no `expires_in`.
    pub default_ttl: Duration,
}

impl Default for TokenCacheSettings {
    fn default() -> Self {
        Self {
            refresh_margin: Duration::from_secs(60),
            default_ttl: Duration::from_secs(300),
        }
    }
}

struct CachedToken {
    access_token: SecretString,
    expires_at: Instant,
    stale_at: Instant,
}

impl CachedToken {
    fn new(
        access_token: SecretString,
        lifetime: Duration,
        refresh_margin: Duration,
        now: Instant,
    ) -> Self {
        let lifetime = lifetime.min(MAX_TOKEN_LIFETIME);
        let margin = refresh_margin.min(lifetime / 2);
        Self {
            access_token,
            expires_at: now + lifetime,
            stale_at: now + (lifetime - margin),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.stale_at && now < self.expires_at
    }
}

/// Process-wide bearer token cache, one entry per tenant.
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    tokens: DashMap<String, CachedToken>,
    settings: TokenCacheSettings,
}

impl TokenCache {
    #[must_use]
    pub fn new(source: Arc<dyn TokenSource>, settings: TokenCacheSettings) -> Self {
        Self {
            source,
            tokens: DashMap::new(),
            settings,
        }
    }

    /// Bearer token for `credential.team`, exchanging a new one when the
    /// cached entry is missing or stale.
    ///
    /// # Errors
    ///
    /// `TokenAcquisitionFailed` if the OAuth exchange fails. Nothing is cached
    /// in that case.
    #[instrument(skip_all, fields(team = %credential.team))]
    pub async fn get_token(
        &self,
        credential: &TenantCredential,
    ) -> Result<SecretString, DomainError> {
        if let Some(token) = self.cached(&credential.team) {
            return Ok(token);
        }

        let issued = self
            .source
            .fetch_token(credential)
            .await
            .map_err(|cause| DomainError::TokenAcquisitionFailed {
                team: credential.team.clone(),
                cause,
            })?;

        let lifetime = issued.expires_in.unwrap_or(self.settings.default_ttl);
        let entry = CachedToken::new(
            issued.access_token,
            lifetime,
            self.settings.refresh_margin,
            Instant::now(),
        );
        let token = entry.access_token.clone();
        self.tokens.insert(credential.team.clone(), entry);

        debug!(lifetime_secs = lifetime.as_secs(), "tenant token refreshed");
        Ok(token)
    }

    /// Drop the cached token of `team`, if any.
    pub fn invalidate(&self, team: &str) {
        if self.tokens.remove(team).is_some() {
            debug!(team, "tenant token invalidated");
        }
    }

    /// Whether a fresh token is cached for `team`.
    #[must_use]
    pub fn is_cached(&self, team: &str) -> bool {
        self.cached(team).is_some()
    }

    fn cached(&self, team: &str) -> Option<SecretString> {
        let now = Instant::now();
        self.tokens
            .get(team)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.access_token.clone())
    }
}
