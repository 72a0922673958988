//! Gateway configuration.
//!
//! [`GatewayConfig`] bundles the upstream endpoints, timeouts and the
//! optional application credentials. It is normally built from the
//! environment with [`GatewayConfig::from_env`].

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::auth::AppCredentials;

/// Public (unauthenticated) upstream base.
pub const PUBLIC_BASE_URL: &str = "https://www.reddit.com";

/// Upstream base used with a bearer token.
pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";

/// Client-credentials token endpoint.
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "MyRedditApp/1.0";

/// Environment variable holding the application id.
pub const ENV_CLIENT_ID: &str = "REDDIT_CLIENT_ID";

/// Environment variable holding the application secret.
pub const ENV_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";

/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "REDDIT_USER_AGENT";

// ============================================================================
// Auth Mode
// ============================================================================

/// How the gateway will reach upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Exchange credentials, then call the OAuth base with a bearer token.
    ClientCredentials,
    /// Call the public base without authentication.
    Anonymous,
    /// Credentials are required but absent; only fallback data is served.
    Unavailable,
}

// ============================================================================
// Gateway Config
// ============================================================================

/// Settings for the upstream gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base for unauthenticated requests.
    pub public_base_url: String,
    /// Base for bearer-token requests.
    pub oauth_base_url: String,
    /// Token endpoint.
    pub token_url: String,
    /// User agent sent upstream.
    pub user_agent: String,
    /// Application credentials, if configured.
    pub credentials: Option<AppCredentials>,
    /// Serve fallback data instead of calling upstream without credentials.
    pub require_credentials: bool,
    /// Timeout for unauthenticated requests.
    pub anonymous_timeout: Duration,
    /// Timeout for the exchange and the bearer-token request.
    pub authenticated_timeout: Duration,
    /// Only allow requests to the hosts of the configured bases.
    pub restrict_domains: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            public_base_url: PUBLIC_BASE_URL.to_string(),
            oauth_base_url: OAUTH_BASE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials: None,
            require_credentials: true,
            anonymous_timeout: Duration::from_secs(10),
            authenticated_timeout: Duration::from_secs(15),
            restrict_domains: true,
        }
    }
}

impl GatewayConfig {
    /// Reads credentials and user agent from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials and user agent through `lookup`.
    ///
    /// Credentials are only used when both id and secret are non-empty.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty(ENV_CLIENT_ID), non_empty(ENV_CLIENT_SECRET)) {
            (Some(id), Some(secret)) => Some(AppCredentials::new(id, secret)),
            _ => None,
        };
        debug!(has_credentials = credentials.is_some(), "Gateway configured");

        Self {
            credentials,
            user_agent: non_empty(ENV_USER_AGENT).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            ..Self::default()
        }
    }

    /// Creates a config that never authenticates.
    pub fn anonymous() -> Self {
        Self {
            require_credentials: false,
            ..Self::default()
        }
    }

    /// Sets the credentials.
    #[must_use]
    pub fn with_credentials(mut self, credentials: AppCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Points every endpoint at one base (used against local test servers).
    #[must_use]
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.public_base_url = base.to_string();
        self.oauth_base_url = base.to_string();
        self.token_url = format!("{base}/api/v1/access_token");
        self
    }

    /// Sets whether credentials are required.
    #[must_use]
    pub fn with_require_credentials(mut self, required: bool) -> Self {
        self.require_credentials = required;
        self
    }

    /// Returns how requests will be made.
    pub fn auth_mode(&self) -> AuthMode {
        match (&self.credentials, self.require_credentials) {
            (Some(_), _) => AuthMode::ClientCredentials,
            (None, false) => AuthMode::Anonymous,
            (None, true) => AuthMode::Unavailable,
        }
    }

    /// Hosts of the configured endpoints, for the domain allowlist.
    pub fn allowed_domains(&self) -> Vec<String> {
        let mut hosts: Vec<String> = [&self.public_base_url, &self.oauth_base_url, &self.token_url]
            .into_iter()
            .filter_map(|u| Url::parse(u).ok()?.host_str().map(str::to_string))
            .collect();
        hosts.sort();
        hosts.dedup();
        hosts
    }
}

// ============================================================================
// Tests
// ============================================================================
