//! Host APIs for Feedscope fetches.
//!
//! - [`http`] - HTTP client with tracing and domain allowlist

pub mod http;

pub use http::{HttpClient, ResponseExt, read_listing};
