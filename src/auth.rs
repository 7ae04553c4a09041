//! Client-credentials token provider for the Spotify catalog
//!
//! Exchanges the client id/secret from the environment for a bearer token
//! at the Spotify accounts endpoint and caches it with its expiry. The
//! catalog invalidates the cache when it sees a 401, which forces exactly
//! one re-authentication on the retried request.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";

/// Tokens this close to expiry are treated as stale and re-fetched
const EXPIRY_MARGIN_SECS: i64 = 300;

#[derive(Clone, Debug)]
struct BearerToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    fn is_fresh(&self) -> bool {
        (self.expires_at - Utc::now()).num_seconds() > EXPIRY_MARGIN_SECS
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Cached client-credentials token source.
#[derive(Clone)]
pub struct TokenProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Arc<RwLock<Option<BearerToken>>>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, client_id: String, client_secret: String) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Build a provider from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`,
    /// or None when the credentials are not configured.
    pub fn from_env(http: reqwest::Client) -> Option<Self> {
        let client_id = std::env::var(CLIENT_ID_ENV).ok()?;
        let client_secret = std::env::var(CLIENT_SECRET_ENV).ok()?;
        if client_id.is_empty() || client_secret.is_empty() {
            return None;
        }
        Some(Self::new(http, client_id, client_secret))
    }

    /// Return a bearer token, fetching a new one if the cache is empty or
    /// close to expiry.
    pub async fn bearer(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh() {
                return Ok(token.access_token.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref() {
            if token.is_fresh() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next `bearer()` call re-authenticates.
    pub async fn invalidate(&self) {
        *self.token.write().await = None;
    }

    async fn request_token(&self) -> Result<BearerToken> {
        tracing::debug!("Requesting client-credentials token");
        let body: TokenResponse = self
            .http
            .post(SPOTIFY_TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::info!(expires_in = body.expires_in, "Token obtained");
        Ok(BearerToken {
            access_token: body.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(body.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_near_expiry_is_stale() {
        let fresh = BearerToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(3600),
        };
        assert!(fresh.is_fresh());

        let stale = BearerToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(EXPIRY_MARGIN_SECS - 1),
        };
        assert!(!stale.is_fresh());

        let expired = BearerToken {
            access_token: "t".to_string(),
            expires_at: Utc::now() - chrono::Duration::seconds(10),
        };
        assert!(!expired.is_fresh());
    }

    #[tokio::test]
    async fn invalidate_clears_cached_token() {
        let provider = TokenProvider::new(
            reqwest::Client::new(),
            "id".to_string(),
            "secret".to_string(),
        );
        *provider.token.write().await = Some(BearerToken {
            access_token: "cached".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(3600),
        });

        assert_eq!(provider.bearer().await.unwrap(), "cached");
        provider.invalidate().await;
        assert!(provider.token.read().await.is_none());
    }
}
