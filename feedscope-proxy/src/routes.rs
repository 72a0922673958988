//! Route registration.

use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::cors::cors;
use crate::handlers;
use crate::state::SharedState;

/// Builds the complete router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/proxy/listing/{category}", get(handlers::category_listing))
        .route("/proxy/search", get(handlers::search))
        .route("/api/reddit/r/popular.json", get(handlers::popular_listing))
        .route("/api/reddit/r/{subreddit}", get(handlers::subreddit_listing))
        .route("/api/reddit/search.json", get(handlers::search))
        .route("/api/reddit-popular", get(handlers::popular_listing_strict))
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn(cors))
}
