//! Client-credentials token exchange.
//!
//! Application credentials are exchanged for a bearer token at the token
//! endpoint. Tokens are cached until shortly before they expire so bursts
//! of requests share one exchange.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::host::http::HttpClient;

/// Tokens are treated as expired this long before upstream says so.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when upstream omits `expires_in`.
const DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);

// ============================================================================
// Credentials
// ============================================================================

/// Application credentials for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
    /// Application id.
    pub client_id: String,
    /// Application secret.
    pub client_secret: String,
}

impl AppCredentials {
    /// Creates credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the `Authorization: Basic` header value.
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Token Response
// ============================================================================

/// Token endpoint response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    /// The bearer token.
    #[serde(default)]
    pub access_token: String,
    /// Token type (normally `bearer`).
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    fn lifetime(&self) -> Duration {
        self.expires_in
            .map_or(DEFAULT_LIFETIME, Duration::from_secs)
            .saturating_sub(EXPIRY_MARGIN)
    }
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

// ============================================================================
// Token Exchanger
// ============================================================================

/// Performs and caches the client-credentials exchange.
#[derive(Debug)]
pub struct TokenExchanger {
    http: HttpClient,
    token_url: String,
    credentials: AppCredentials,
    timeout: Duration,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenExchanger {
    /// Creates an exchanger posting to `token_url`.
    pub fn new(
        http: HttpClient,
        token_url: impl Into<String>,
        credentials: AppCredentials,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
            timeout,
            cache: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging credentials if needed.
    pub async fn bearer(&self) -> Result<String, FetchError> {
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if Instant::now() < cached.expires_at {
                debug!("Using cached access token");
                return Ok(cached.value.clone());
            }
        }

        let token = self.exchange().await?;
        let value = token.access_token.clone();
        *cache = Some(CachedToken {
            value: value.clone(),
            expires_at: Instant::now() + token.lifetime(),
        });
        Ok(value)
    }

    /// Drops the cached token so the next call exchanges again.
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    #[instrument(skip(self), fields(url = %self.token_url))]
    async fn exchange(&self) -> Result<AccessToken, FetchError> {
        let response = self
            .http
            .post_form(
                &self.token_url,
                &self.credentials.basic_auth_header(),
                &[("grant_type", "client_credentials")],
                self.timeout,
            )
            .await
            .map_err(|e| FetchError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Token endpoint rejected credentials");
            return Err(FetchError::TokenExchange(format!("HTTP {}", status.as_u16())));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| FetchError::TokenExchange(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(FetchError::TokenExchange(
                "response did not include an access token".to_string(),
            ));
        }

        debug!(expires_in = ?token.expires_in, "Access token obtained");
        Ok(token)
    }
}

// ============================================================================
// Tests
// ============================================================================
