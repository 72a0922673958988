// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Feedscope Core
//!
//! Core types and models for the Feedscope listing viewer.
//!
//! This crate provides the foundational abstractions shared by the proxy,
//! the client store and the terminal views:
//!
//! - Domain models (categories, listings, posts)
//! - Query construction for listing and search requests
//! - Error types
//!
//! ## Key Types
//!
//! ### Catalog
//! - [`Category`] - One entry of the fixed category catalog
//!
//! ### Listing Types
//! - [`Listing`] - A page of posts plus pagination cursors
//! - [`Post`] - One content item with engagement metrics and media
//! - [`PostMedia`] - Media descriptor derived from a post
//! - [`DataOrigin`] - Whether a listing came from upstream or the fallback
//!
//! ### Requests
//! - [`ListingTarget`] - What a request asks for (popular, subreddit, search)
//! - [`ListingQuery`] - Query parameters sent alongside a request

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Catalog
    Category,
    DEFAULT_CATEGORY,
    DEFAULT_TARGET,
    // Listing types
    DataOrigin,
    Listing,
    Media,
    Oembed,
    Post,
    PostMedia,
    RedditVideo,
    format_count,
    // Requests
    DEFAULT_LIMIT,
    ListingQuery,
    ListingTarget,
    encode_component,
};
