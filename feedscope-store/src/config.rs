//! Configuration management.
//!
//! The file lives at `<config dir>/feedscope/config.json`. A missing file
//! means defaults. Environment variables override file values; upstream
//! credentials are only ever read from the environment.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use feedscope_core::{DEFAULT_CATEGORY, DEFAULT_LIMIT};
use feedscope_fetch::context::ENV_USER_AGENT;
use feedscope_fetch::{
    DEFAULT_PROXY_URL, GatewayConfig, ProxyClient, RetryPolicy, UpstreamGateway,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::feed_store::StoreOptions;
use crate::persistence::{default_config_dir, load_json, save_json};

/// Overrides `proxy.bind`.
pub const ENV_BIND: &str = "FEEDSCOPE_BIND";
/// Overrides `client.proxy_url`.
pub const ENV_PROXY_URL: &str = "FEEDSCOPE_PROXY_URL";
/// Overrides `proxy.serve_fallback` (`0`/`false` disables it).
pub const ENV_SERVE_FALLBACK: &str = "FEEDSCOPE_SERVE_FALLBACK";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Proxy server settings.
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Upstream API settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Viewer settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Proxy server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Serve sample data when upstream stays unavailable.
    #[serde(default = "default_true")]
    pub serve_fallback: bool,
    /// Attempts per listing request.
    #[serde(default = "default_listing_attempts")]
    pub listing_attempts: u32,
    /// Attempts per search request.
    #[serde(default = "default_search_attempts")]
    pub search_attempts: u32,
}

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// User agent; `REDDIT_USER_AGENT` wins when set.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Serve sample data instead of calling upstream without credentials.
    #[serde(default = "default_true")]
    pub require_credentials: bool,
    /// Single base URL for every upstream endpoint (testing only).
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Proxy the CLI talks to.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Posts per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Category shown when none is given.
    #[serde(default = "default_category")]
    pub default_category: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_listing_attempts() -> u32 {
    RetryPolicy::listing().max_attempts
}

fn default_search_attempts() -> u32 {
    RetryPolicy::search().max_attempts
}

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            serve_fallback: true,
            listing_attempts: default_listing_attempts(),
            search_attempts: default_search_attempts(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            require_credentials: true,
            base_url: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            limit: default_limit(),
            default_category: default_category(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_dir().join("config.json")
    }

    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads configuration from a specific path.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config: Config = load_json(path).await?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Applies environment overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = non_empty(ENV_BIND) {
            self.proxy.bind = bind;
        }
        if let Some(url) = non_empty(ENV_PROXY_URL) {
            self.client.proxy_url = url;
        }
        if let Some(flag) = non_empty(ENV_SERVE_FALLBACK) {
            self.proxy.serve_fallback = !matches!(flag.trim(), "0" | "false" | "no" | "off");
        }
        self
    }

    /// Parses the proxy listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, StoreError> {
        self.proxy
            .bind
            .parse()
            .map_err(|e| StoreError::Config(format!("invalid bind address '{}': {e}", self.proxy.bind)))
    }

    /// Builds the gateway configuration, reading credentials through `lookup`.
    pub fn gateway_config<F>(&self, lookup: F) -> GatewayConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent_from_env = lookup(ENV_USER_AGENT)
            .is_some_and(|v| !v.trim().is_empty());

        let mut gateway = GatewayConfig::from_lookup(lookup)
            .with_require_credentials(self.upstream.require_credentials);
        if let (false, Some(agent)) = (user_agent_from_env, &self.upstream.user_agent) {
            gateway = gateway.with_user_agent(agent.clone());
        }
        if let Some(base) = &self.upstream.base_url {
            gateway = gateway.with_base_url(base);
        }
        gateway
    }

    /// Builds the gateway from the process environment.
    pub fn gateway(&self) -> Result<UpstreamGateway, StoreError> {
        UpstreamGateway::new(self.gateway_config(|key| std::env::var(key).ok()))
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Builds a client for the configured proxy.
    pub fn proxy_client(&self) -> Result<ProxyClient, StoreError> {
        ProxyClient::new(&self.client.proxy_url).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Retry policies for the proxy, as `(listing, search)`.
    pub fn proxy_retry(&self) -> (RetryPolicy, RetryPolicy) {
        (
            RetryPolicy::listing().with_max_attempts(self.proxy.listing_attempts),
            RetryPolicy::search().with_max_attempts(self.proxy.search_attempts),
        )
    }

    /// Store options for a viewer talking to the proxy.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::default().with_limit(self.client.limit)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use feedscope_fetch::AuthMode;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.proxy.bind, "127.0.0.1:3000");
        assert!(config.proxy.serve_fallback);
        assert_eq!(config.proxy.listing_attempts, 3);
        assert_eq!(config.proxy.search_attempts, 2);
        assert_eq!(config.client.limit, 25);
        assert_eq!(config.client.default_category, "all");
        assert!(Config::default_path().ends_with("feedscope/config.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"proxy": {"bind": "0.0.0.0:8080"}}"#).unwrap();
        assert_eq!(config.proxy.bind, "0.0.0.0:8080");
        assert_eq!(config.proxy.listing_attempts, 3);
        assert_eq!(config.client, ClientConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides(lookup(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_PROXY_URL, "http://proxy.local"),
            (ENV_SERVE_FALLBACK, "false"),
        ]));
        assert_eq!(config.proxy.bind, "0.0.0.0:9000");
        assert_eq!(config.client.proxy_url, "http://proxy.local");
        assert!(!config.proxy.serve_fallback);
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_invalid_bind_is_config_error() {
        let mut config = Config::default();
        config.proxy.bind = "nowhere".into();
        assert!(matches!(config.bind_addr(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_gateway_config_credentials_from_env_only() {
        let config = Config::default();
        let without = config.gateway_config(lookup(&[]));
        assert_eq!(without.auth_mode(), AuthMode::Unavailable);

        let with = config.gateway_config(lookup(&[
            ("REDDIT_CLIENT_ID", "id"),
            ("REDDIT_CLIENT_SECRET", "secret"),
        ]));
        assert_eq!(with.auth_mode(), AuthMode::ClientCredentials);
    }

    #[test]
    fn test_gateway_user_agent_precedence() {
        let mut config = Config::default();
        config.upstream.user_agent = Some("file-agent/1.0".into());

        let from_file = config.gateway_config(lookup(&[]));
        assert_eq!(from_file.user_agent, "file-agent/1.0");

        let from_env = config.gateway_config(lookup(&[("REDDIT_USER_AGENT", "env-agent/2.0")]));
        assert_eq!(from_env.user_agent, "env-agent/2.0");
    }

    #[test]
    fn test_anonymous_upstream() {
        let mut config = Config::default();
        config.upstream.require_credentials = false;
        config.upstream.base_url = Some("http://127.0.0.1:9999".into());

        let gateway = config.gateway_config(lookup(&[]));
        assert_eq!(gateway.auth_mode(), AuthMode::Anonymous);
        assert_eq!(gateway.public_base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_proxy_retry_uses_attempt_counts() {
        let mut config = Config::default();
        config.proxy.listing_attempts = 5;
        let (listing, search) = config.proxy_retry();
        assert_eq!(listing.max_attempts, 5);
        assert_eq!(search.max_attempts, 2);
    }
}
