//! Route handlers.
//!
//! Every listing route funnels into `serve_listing`: run the source
//! through the retry policy, then either return what it produced or apply
//! the fallback mode.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use feedscope_core::{Listing, ListingQuery, ListingTarget};
use feedscope_fetch::{ORIGIN_HEADER, RetryPolicy, mock_listing};
use serde_json::json;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::{FallbackMode, SharedState};

type Params = Query<Vec<(String, String)>>;

// ============================================================================
// Listing Routes
// ============================================================================

/// `GET /proxy/listing/{category}`: resolves the key through the catalog.
pub async fn category_listing(
    State(state): State<SharedState>,
    Path(category): Path<String>,
    Query(params): Params,
    uri: Uri,
) -> Response {
    let target = ListingTarget::for_category(&category);
    let query = ListingQuery::from_pairs(params);
    serve_listing(&state, &state.listing_retry, target, query, state.fallback, &uri).await
}

/// `GET /api/reddit/r/{subreddit}`: `subreddit` may carry a `.json` suffix.
pub async fn subreddit_listing(
    State(state): State<SharedState>,
    Path(subreddit): Path<String>,
    Query(params): Params,
    uri: Uri,
) -> Response {
    let target = ListingTarget::subreddit(&subreddit);
    let query = ListingQuery::from_pairs(params);
    serve_listing(&state, &state.listing_retry, target, query, state.fallback, &uri).await
}

/// `GET /api/reddit/r/popular.json`.
pub async fn popular_listing(
    State(state): State<SharedState>,
    Query(params): Params,
    uri: Uri,
) -> Response {
    let query = ListingQuery::from_pairs(params);
    serve_listing(
        &state,
        &state.listing_retry,
        ListingTarget::Popular,
        query,
        state.fallback,
        &uri,
    )
    .await
}

/// `GET /api/reddit-popular`: popular listing that reports failures as 500.
pub async fn popular_listing_strict(
    State(state): State<SharedState>,
    Query(params): Params,
    uri: Uri,
) -> Response {
    let query = ListingQuery::from_pairs(params);
    serve_listing(
        &state,
        &state.listing_retry,
        ListingTarget::Popular,
        query,
        FallbackMode::Error,
        &uri,
    )
    .await
}

/// `GET /proxy/search?q=` and `GET /api/reddit/search.json?q=`.
pub async fn search(
    State(state): State<SharedState>,
    Query(params): Params,
    uri: Uri,
) -> Response {
    let term = params
        .iter()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();
    if term.is_empty() {
        return ApiError::bad_request("Missing search query parameter 'q'", uri.to_string())
            .into_response();
    }

    let query = ListingQuery::from_pairs(params);
    serve_listing(
        &state,
        &state.search_retry,
        ListingTarget::search(term),
        query,
        state.fallback,
        &uri,
    )
    .await
}

async fn serve_listing(
    state: &SharedState,
    policy: &RetryPolicy,
    target: ListingTarget,
    query: ListingQuery,
    fallback: FallbackMode,
    uri: &Uri,
) -> Response {
    let context = target.to_string();
    let source = state.source.as_ref();
    let result = policy
        .run(&context, |_| source.fetch_listing(&target, &query))
        .await;

    match (result, fallback) {
        (Ok(listing), _) => listing_response(listing),
        (Err(failure), FallbackMode::Serve) => {
            warn!(listing = %target, attempts = failure.attempts, error = %failure.last_error, "Serving fallback data");
            listing_response(mock_listing(target.fallback_label()))
        }
        (Err(failure), FallbackMode::Error) => {
            warn!(listing = %target, attempts = failure.attempts, error = %failure.last_error, "Upstream fetch failed");
            ApiError::upstream(failure.last_error.to_string(), uri.to_string()).into_response()
        }
    }
}

fn listing_response(listing: Listing) -> Response {
    info!(posts = listing.len(), origin = listing.origin.as_str(), "Serving listing");
    (
        StatusCode::OK,
        [(ORIGIN_HEADER, listing.origin.as_str())],
        Json(listing),
    )
        .into_response()
}

// ============================================================================
// System Routes
// ============================================================================

/// `GET /api/health`: liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "message": "API is working!",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unmatched paths.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(uri.to_string())
}
