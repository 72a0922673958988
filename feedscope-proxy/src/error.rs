//! Proxy error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Error starting or running the server.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Could not bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Server stopped with an error.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Error response body: `{error, details, url}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    /// Short summary.
    pub error: String,
    /// What went wrong.
    pub details: String,
    /// The request that failed.
    pub url: String,
}

impl ApiError {
    /// Upstream could not be reached (500).
    pub fn upstream(details: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "Failed to fetch data from Reddit".to_string(),
            details: details.into(),
            url: url.into(),
        }
    }

    /// The request is missing something (400).
    pub fn bad_request(details: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Bad request".to_string(),
            details: details.into(),
            url: url.into(),
        }
    }

    /// No such route (404).
    pub fn not_found(url: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Not found".to_string(),
            details: "No route matches this path".to_string(),
            url: url.into(),
        }
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
