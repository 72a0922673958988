//! HTTP client for the Feedscope proxy.
//!
//! This is what the client store uses to reach the proxy's
//! `/api/reddit/...` routes. The proxy reports whether it served real or
//! fallback data in the [`ORIGIN_HEADER`] response header.

use std::time::Duration;

use async_trait::async_trait;
use feedscope_core::{DataOrigin, Listing, ListingQuery, ListingTarget};
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::host::http::{HttpClient, read_listing};
use crate::source::ListingSource;

/// Response header naming the data origin (`upstream` or `fallback`).
pub const ORIGIN_HEADER: &str = "x-feedscope-origin";

/// Default proxy address.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Path prefix of the proxy's listing routes.
const API_PREFIX: &str = "/api/reddit";

/// User agent for proxy requests.
const USER_AGENT: &str = concat!("feedscope/", env!("CARGO_PKG_VERSION"));

/// Listing request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Proxy Client
// ============================================================================

/// Client for the proxy's listing routes.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
    origin: Option<String>,
}

impl ProxyClient {
    /// Creates a client for the proxy at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(USER_AGENT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            origin: None,
        })
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `Origin` and enforces the proxy's CORS answer.
    ///
    /// Responses whose `Access-Control-Allow-Origin` is neither `*` nor
    /// `origin` fail with [`FetchError::CrossOrigin`].
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Returns the proxy base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the proxy URL for a target.
    pub fn url_for(&self, target: &ListingTarget, query: &ListingQuery) -> String {
        format!(
            "{}{API_PREFIX}{}?{}",
            self.base_url,
            target.path(),
            query.to_query_string(target)
        )
    }

    fn check_cors(&self, headers: &HeaderMap) -> Result<(), FetchError> {
        let Some(origin) = &self.origin else {
            return Ok(());
        };
        let allowed = headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok());
        match allowed {
            Some("*") => Ok(()),
            Some(value) if value == origin => Ok(()),
            _ => Err(FetchError::CrossOrigin(format!(
                "{} did not allow origin {origin}",
                self.base_url
            ))),
        }
    }

    #[instrument(skip(self, target, query), fields(listing = %target))]
    async fn fetch(
        &self,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError> {
        let url = self.url_for(target, query);

        let mut headers = HeaderMap::new();
        if let Some(origin) = &self.origin {
            let value = HeaderValue::from_str(origin)
                .map_err(|e| FetchError::CrossOrigin(format!("invalid origin: {e}")))?;
            headers.insert(header::ORIGIN, value);
        }

        let response = self.http.get_with_headers(&url, headers, self.timeout).await?;
        self.check_cors(response.headers())?;

        let origin = response
            .headers()
            .get(ORIGIN_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(DataOrigin::parse)
            .unwrap_or_default();

        let listing = read_listing(response, self.timeout).await?.with_origin(origin);
        debug!(posts = listing.len(), origin = origin.as_str(), "Listing received from proxy");
        Ok(listing)
    }
}

#[async_trait]
impl ListingSource for ProxyClient {
    fn name(&self) -> &str {
        "proxy"
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
    fn test_listing_url() {
        let client = ProxyClient::new("http://localhost:3000/").unwrap();
        let url = client.url_for(&ListingTarget::subreddit("technology"), &ListingQuery::default());
        assert_eq!(
            url,
            "http://localhost:3000/api/reddit/r/technology.json?limit=25&raw_json=1"
        );
    }

    #[test]
    fn test_search_url_is_component_encoded() {
        let client = ProxyClient::new(DEFAULT_PROXY_URL).unwrap();
        let url = client.url_for(
            &ListingTarget::search("cake recipes & tips"),
            &ListingQuery::default(),
        );
        assert_eq!(
            url,
            "http://127.0.0.1:3000/api/reddit/search.json?q=cake%20recipes%20%26%20tips&limit=25&raw_json=1"
        );
    }

    #[test]
    fn test_cors_check() {
        let client = ProxyClient::new(DEFAULT_PROXY_URL)
            .unwrap()
            .with_origin("https://viewer.example");

        let mut headers = HeaderMap::new();
        assert!(matches!(
            client.check_cors(&headers),
            Err(FetchError::CrossOrigin(_))
        ));

        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        assert!(client.check_cors(&headers).is_ok());

        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://other.example"),
        );
        assert!(client.check_cors(&headers).is_err());
    }
}
