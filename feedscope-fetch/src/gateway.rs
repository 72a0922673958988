//! Upstream gateway.
//!
//! [`UpstreamGateway`] turns a [`ListingTarget`] into one upstream request.
//! With credentials it authenticates through the client-credentials grant
//! and calls the OAuth base. Without credentials it either serves fallback
//! data (the default) or calls the public base anonymously.

use async_trait::async_trait;
use feedscope_core::{Listing, ListingQuery, ListingTarget};
use reqwest::StatusCode;
use tracing::{debug, info, instrument, warn};

use crate::auth::TokenExchanger;
use crate::context::{AuthMode, GatewayConfig};
use crate::error::FetchError;
use crate::fallback::mock_listing;
use crate::host::http::{HttpClient, ResponseExt, read_listing};
use crate::source::ListingSource;

/// Client for the upstream listing API.
#[derive(Debug)]
pub struct UpstreamGateway {
    config: GatewayConfig,
    http: HttpClient,
    tokens: Option<TokenExchanger>,
}

impl UpstreamGateway {
    /// Creates a gateway from a config.
    pub fn new(config: GatewayConfig) -> Result<Self, FetchError> {
        let mut http = HttpClient::new(config.user_agent.clone())?;
        if config.restrict_domains {
            http = http.with_allowed_domains(config.allowed_domains());
        }

        let tokens = config.credentials.clone().map(|credentials| {
            TokenExchanger::new(
                http.clone(),
                config.token_url.clone(),
                credentials,
                config.authenticated_timeout,
            )
        });

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Returns the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns how requests are made.
    pub fn auth_mode(&self) -> AuthMode {
        self.config.auth_mode()
    }

    /// Builds the full upstream URL for a target against `base`.
    pub fn url_for(base: &str, target: &ListingTarget, query: &ListingQuery) -> String {
        format!(
            "{}{}?{}",
            base.trim_end_matches('/'),
            target.path(),
            query.to_query_string(target)
        )
    }

    #[instrument(skip(self, target, query), fields(listing = %target))]
    async fn fetch(
        &self,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError> {
        match (&self.tokens, self.config.require_credentials) {
            (Some(tokens), _) => self.fetch_authenticated(tokens, target, query).await,
            (None, false) => self.fetch_anonymous(target, query).await,
            (None, true) => {
                info!("Upstream credentials not configured, serving fallback data");
                Ok(mock_listing(target.fallback_label()))
            }
        }
    }

    async fn fetch_authenticated(
        &self,
        tokens: &TokenExchanger,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError> {
        let token = match tokens.bearer().await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Token exchange failed, serving fallback data");
                return Ok(mock_listing(target.fallback_label()));
            }
        };

        let url = Self::url_for(&self.config.oauth_base_url, target, query);
        let timeout = self.config.authenticated_timeout;
        let response = self
            .http
            .get(&url, Some(&format!("Bearer {token}")), timeout)
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => tokens.invalidate().await,
            StatusCode::TOO_MANY_REQUESTS => {
                debug!(retry_after = ?response.retry_after_secs(), "Rate limited upstream");
            }
            _ => {}
        }

        let listing = read_listing(response, timeout).await?;
        debug!(posts = listing.len(), "Upstream listing received");
        Ok(listing)
    }

    async fn fetch_anonymous(
        &self,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError> {
        let url = Self::url_for(&self.config.public_base_url, target, query);
        let timeout = self.config.anonymous_timeout;
        let response = self.http.get(&url, None, timeout).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            debug!(retry_after = ?response.retry_after_secs(), "Rate limited upstream");
        }

        let listing = read_listing(response, timeout).await?;
        debug!(posts = listing.len(), "Upstream listing received");
        Ok(listing)
    }
}

#[async_trait]
impl ListingSource for UpstreamGateway {
    fn name(&self) -> &str {
        "upstream"
    }

    async fn fetch_listing(
        &self,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError> {
        self.fetch(target, query).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_subreddit() {
        let url = UpstreamGateway::url_for(
            "https://www.reddit.com/",
            &ListingTarget::subreddit("technology"),
            &ListingQuery::default(),
        );
        assert_eq!(url, "https://www.reddit.com/r/technology.json?limit=25&raw_json=1");
    }

    #[test]
    fn test_url_for_search() {
        let url = UpstreamGateway::url_for(
            "https://oauth.reddit.com",
            &ListingTarget::search("cake recipes & tips"),
            &ListingQuery::default(),
        );
        assert_eq!(
            url,
            "https://oauth.reddit.com/search.json?q=cake%20recipes%20%26%20tips&limit=25&raw_json=1"
        );
    }

    #[test]
    fn test_auth_mode_follows_config() {
        let gateway = UpstreamGateway::new(GatewayConfig::default()).unwrap();
        assert_eq!(gateway.auth_mode(), AuthMode::Unavailable);

        let gateway = UpstreamGateway::new(GatewayConfig::anonymous()).unwrap();
        assert_eq!(gateway.auth_mode(), AuthMode::Anonymous);
    }
}
