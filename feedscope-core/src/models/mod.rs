//! Domain models for Feedscope.
//!
//! ## Submodules
//!
//! - `category` - The fixed category catalog
//! - `post` - A single post and its media helpers
//! - `listing` - Listing envelope and validation
//! - `query` - Request targets and query-string encoding

mod category;
mod listing;
mod post;
mod query;

pub use category::{Category, DEFAULT_CATEGORY, DEFAULT_TARGET};
pub use listing::{DataOrigin, Listing};
pub use post::{Media, Oembed, Post, PostMedia, RedditVideo, format_count};
pub use query::{DEFAULT_LIMIT, ListingQuery, ListingTarget, encode_component};
#[cfg(test)]
mod serde_tests;
