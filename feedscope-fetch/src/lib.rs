// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Feedscope Fetch
//!
//! Everything that talks HTTP on behalf of Feedscope.
//!
//! ## Upstream
//!
//! - [`gateway::UpstreamGateway`] - Calls the upstream listing API, with an
//!   optional client-credentials exchange ([`auth`])
//! - [`fallback`] - Sample listings served when upstream is unavailable
//! - [`context::GatewayConfig`] - Endpoints, timeouts and credentials
//!
//! ## Proxy side
//!
//! - [`client::ProxyClient`] - Calls the Feedscope proxy
//! - [`source::ListingSource`] - The trait both of the above implement
//!
//! ## Retry
//!
//! - [`retry::RetryPolicy`] - Bounded retries with pluggable backoff
//! - [`error::FailureCategory`] - Maps failures to user-facing messages
//!
//! ## Example
//!
//! ```ignore
//! use feedscope_core::{ListingQuery, ListingTarget};
//! use feedscope_fetch::{GatewayConfig, ListingSource, RetryPolicy, UpstreamGateway};
//!
//! let gateway = UpstreamGateway::new(GatewayConfig::from_env())?;
//! let target = ListingTarget::for_category("technology");
//! let listing = RetryPolicy::listing()
//!     .run("r/technology", |_| gateway.fetch_listing(&target, &ListingQuery::default()))
//!     .await?;
//! ```

pub mod auth;
pub mod client;
pub mod context;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod host;
pub mod retry;
pub mod source;

// Re-export key types at crate root

// Errors
pub use error::{FailureCategory, FetchError};

// Host APIs
pub use host::http::HttpClient;

// Upstream
pub use auth::{AccessToken, AppCredentials, TokenExchanger};
pub use context::{AuthMode, GatewayConfig};
pub use fallback::{SEARCH_FALLBACK_LABEL, mock_listing, mock_listing_at};
pub use gateway::UpstreamGateway;

// Proxy side
pub use client::{DEFAULT_PROXY_URL, ORIGIN_HEADER, ProxyClient};
pub use source::ListingSource;

// Retry
pub use retry::{Backoff, RetryAttempt, RetryFailure, RetryPolicy};
