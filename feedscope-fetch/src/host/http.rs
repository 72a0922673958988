//! HTTP client with tracing, per-request timeouts and a domain allowlist.

use std::time::Duration;

use feedscope_core::Listing;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, header};
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: String,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a client that sends `user_agent` on every request.
    pub fn new(user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let user_agent = user_agent.into();
        let inner = Client::builder()
            .user_agent(user_agent.clone())
            .build()
            .map_err(|e| FetchError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner,
            user_agent,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Returns the configured user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request with an optional authorization header.
    pub async fn get(
        &self,
        url: &str,
        auth_header: Option<&str>,
        timeout: Duration,
    ) -> Result<Response, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth_header {
            let value = HeaderValue::from_str(auth)
                .map_err(|e| FetchError::Http(format!("invalid authorization header: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        self.get_with_headers(url, headers, timeout).await
    }

    /// Performs a GET request with custom headers.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!(
            authenticated = headers.contains_key(header::AUTHORIZATION),
            "GET request"
        );

        let response = self
            .inner
            .get(url)
            .timeout(timeout)
            .header(header::ACCEPT, "application/json")
            .headers(headers)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, timeout))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a POST request with form data and an authorization header.
    #[instrument(skip(self, auth_header, form), fields(url = %url))]
    pub async fn post_form<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        auth_header: &str,
        form: &T,
        timeout: Duration,
    ) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("POST request with form data");

        let response = self
            .inner
            .post(url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, auth_header)
            .form(form)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, timeout))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// Response Handling
// ============================================================================

/// Checks the status and parses the body as a listing.
///
/// Non-success statuses become [`FetchError::Status`]; bodies that are not
/// JSON or lack `data.children` become [`FetchError::InvalidFormat`].
pub async fn read_listing(response: Response, timeout: Duration) -> Result<Listing, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_reqwest(&e, timeout))?;
    Ok(Listing::from_slice(&body)?)
}

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================
