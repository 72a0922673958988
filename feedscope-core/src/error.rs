//! Core error types for Feedscope.

use thiserror::Error;

/// Core error type for Feedscope model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The body parsed as JSON but lacks the listing envelope.
    #[error("Invalid listing format: {0}")]
    InvalidListing(String),

    /// Unknown category key.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
