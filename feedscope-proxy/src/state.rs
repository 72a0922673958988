//! Shared proxy state.

use std::sync::Arc;

use feedscope_fetch::{ListingSource, RetryPolicy};

/// What the proxy does once every attempt has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackMode {
    /// Answer 200 with the sample listing.
    #[default]
    Serve,
    /// Answer 500 with an error body.
    Error,
}

impl FallbackMode {
    /// Maps a "serve fallback" flag to a mode.
    pub fn from_flag(serve_fallback: bool) -> Self {
        if serve_fallback { Self::Serve } else { Self::Error }
    }
}

/// Everything a handler needs.
pub struct ProxyState {
    /// Where listings come from.
    pub source: Arc<dyn ListingSource>,
    /// Retry policy for popular and subreddit listings.
    pub listing_retry: RetryPolicy,
    /// Retry policy for searches.
    pub search_retry: RetryPolicy,
    /// Behaviour after exhausting retries.
    pub fallback: FallbackMode,
}

/// State handed to the router.
pub type SharedState = Arc<ProxyState>;

impl ProxyState {
    /// Creates state with the default retry policies and fallback on.
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            source,
            listing_retry: RetryPolicy::listing(),
            search_retry: RetryPolicy::search(),
            fallback: FallbackMode::Serve,
        }
    }

    /// Sets the fallback mode.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackMode) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replaces both retry policies.
    #[must_use]
    pub fn with_retry(mut self, listing: RetryPolicy, search: RetryPolicy) -> Self {
        self.listing_retry = listing;
        self.search_retry = search;
        self
    }

    /// Wraps the state for the router.
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

impl std::fmt::Debug for ProxyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyState")
            .field("source", &self.source.name())
            .field("listing_retry", &self.listing_retry)
            .field("search_retry", &self.search_retry)
            .field("fallback", &self.fallback)
            .finish()
    }
}
