//! Fetch error types and the user-facing failure taxonomy.

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for gateway and proxy-client operations.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection could not be established or was dropped.
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// Upstream answered with a non-success status.
    #[error("HTTP {code}: {reason}")]
    Status {
        /// Status code.
        code: u16,
        /// Reason phrase.
        reason: String,
    },

    /// Success status but the body is not a listing.
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// The proxy refused the caller's origin.
    #[error("Cross-origin request blocked: {0}")]
    CrossOrigin(String),

    /// Client-credentials exchange failed.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl FetchError {
    /// Maps a transport error, using `timeout` for timeouts.
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() || err.is_request() || err.is_body() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::InvalidFormat(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }

    /// Builds a status error from a code, filling in the canonical reason.
    pub fn status(code: u16) -> Self {
        let reason = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::Status { code, reason }
    }

    /// Returns the failure category used for user-facing messages.
    pub fn category(&self) -> FailureCategory {
        match self {
            Self::Network(_) => FailureCategory::Network,
            Self::Status { code: 429, .. } => FailureCategory::RateLimited,
            Self::Status { code: 403, .. } => FailureCategory::AccessDenied,
            Self::Status { code: 404, .. } => FailureCategory::NotFound,
            Self::Status { code, .. } if (500..=599).contains(code) => {
                FailureCategory::ServerError
            }
            Self::CrossOrigin(_) => FailureCategory::CrossOrigin,
            Self::InvalidFormat(_) => FailureCategory::InvalidFormat,
            _ => FailureCategory::Generic,
        }
    }

    /// Returns the user-facing message for this error in `context`.
    pub fn user_message(&self, context: &str) -> String {
        self.category().describe(context, &self.to_string())
    }
}

impl From<feedscope_core::CoreError> for FetchError {
    fn from(err: feedscope_core::CoreError) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

// ============================================================================
// Failure Category
// ============================================================================

/// Coarse classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// No connection.
    Network,
    /// HTTP 429.
    RateLimited,
    /// HTTP 403.
    AccessDenied,
    /// HTTP 404.
    NotFound,
    /// HTTP 5xx.
    ServerError,
    /// Blocked by cross-origin policy.
    CrossOrigin,
    /// Body was not a listing.
    InvalidFormat,
    /// Anything else.
    Generic,
}

impl FailureCategory {
    /// Returns the fixed advice for this category, if it has one.
    pub fn advisory(&self) -> Option<&'static str> {
        match self {
            Self::Network => Some(
                "Network connection failed. Please check your internet connection and try again.",
            ),
            Self::RateLimited => Some("Too many requests. Please wait a moment and try again."),
            Self::AccessDenied => {
                Some("Access denied. The Reddit API may be temporarily unavailable.")
            }
            Self::NotFound => Some("The requested content was not found."),
            Self::ServerError => Some(
                "Server error. Reddit may be experiencing issues. Please try again later.",
            ),
            Self::CrossOrigin => Some(
                "Cross-origin request blocked. This might be a deployment configuration issue.",
            ),
            Self::InvalidFormat => Some(
                "Invalid response format. The API might be returning an error page instead of JSON data.",
            ),
            Self::Generic => None,
        }
    }

    /// Formats the message shown for a failure in `context`.
    ///
    /// The context label appears exactly once.
    pub fn describe(&self, context: &str, raw: &str) -> String {
        match (self.advisory(), context.is_empty()) {
            (Some(advice), true) => advice.to_string(),
            (Some(advice), false) => format!("{context}: {advice}"),
            (None, true) => format!("Error loading data: {raw}"),
            (None, false) => format!("Error loading data for {context}: {raw}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert_eq!(FetchError::status(429).category(), FailureCategory::RateLimited);
        assert_eq!(FetchError::status(403).category(), FailureCategory::AccessDenied);
        assert_eq!(FetchError::status(404).category(), FailureCategory::NotFound);
        assert_eq!(FetchError::status(503).category(), FailureCategory::ServerError);
        assert_eq!(FetchError::status(418).category(), FailureCategory::Generic);
    }

    #[test]
    fn test_status_reason() {
        let err = FetchError::status(503);
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn test_categorized_message_is_prefixed() {
        let msg = FetchError::status(503).user_message("r/technology");
        assert_eq!(
            msg,
            "r/technology: Server error. Reddit may be experiencing issues. Please try again later."
        );
    }

    #[test]
    fn test_sub_second_timeout_message() {
        let err = FetchError::Timeout(Duration::from_millis(100));
        assert_eq!(err.to_string(), "Request timed out after 0.1 seconds");
    }

    #[test]
    fn test_generic_message_names_context_once() {
        let msg = FetchError::Timeout(Duration::from_secs(10)).user_message("r/popular");
        assert_eq!(
            msg,
            "Error loading data for r/popular: Request timed out after 10 seconds"
        );
        assert_eq!(msg.matches("r/popular").count(), 1);
    }

    #[test]
    fn test_network_and_format_messages() {
        let net = FetchError::Network("connection refused".into()).user_message("");
        assert!(net.starts_with("Network connection failed."));

        let bad = FetchError::InvalidFormat("<html>".into()).user_message("search");
        assert!(bad.starts_with("search: Invalid response format."));
    }
}
