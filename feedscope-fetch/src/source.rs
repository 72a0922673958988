//! The listing source seam.
//!
//! Both the proxy (calling upstream through [`UpstreamGateway`]) and the
//! client store (calling the proxy through [`ProxyClient`]) depend on this
//! trait rather than a concrete HTTP client, so tests can substitute a
//! scripted source.
//!
//! [`UpstreamGateway`]: crate::gateway::UpstreamGateway
//! [`ProxyClient`]: crate::client::ProxyClient

use async_trait::async_trait;
use feedscope_core::{Listing, ListingQuery, ListingTarget};

use crate::error::FetchError;

/// Something that can produce a listing for a target.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// Fetches one page for a popular or subreddit target.
    async fn fetch_listing(
        &self,
        target: &ListingTarget,
        query: &ListingQuery,
    ) -> Result<Listing, FetchError>;

    /// Fetches one page of search results for `term`.
    async fn fetch_search(&self, term: &str, query: &ListingQuery) -> Result<Listing, FetchError> {
        self.fetch_listing(&ListingTarget::search(term), query).await
    }
}
