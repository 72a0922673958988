// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Feedscope Proxy
//!
//! A small HTTP server sitting between viewers and the upstream listing
//! API. It retries upstream failures, substitutes sample data when
//! upstream stays unavailable, and answers every request with permissive
//! CORS headers.
//!
//! ## Routes
//!
//! | Route | Target |
//! |---|---|
//! | `GET /proxy/listing/{category}` | catalog category |
//! | `GET /proxy/search?q=` | search |
//! | `GET /api/reddit/r/popular.json` | popular |
//! | `GET /api/reddit/r/{subreddit}.json` | subreddit |
//! | `GET /api/reddit/search.json?q=` | search |
//! | `GET /api/reddit-popular` | popular, 500 on failure |
//! | `GET /api/health` | liveness |
//!
//! Listing responses carry an `X-Feedscope-Origin` header set to
//! `upstream` or `fallback`.

pub mod cors;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

pub use error::{ApiError, ProxyError};
pub use routes::router;
pub use state::{FallbackMode, ProxyState, SharedState};

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: SharedState) -> Result<(), ProxyError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ProxyError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let local = listener.local_addr()?;
    info!(addr = %local, source = state.source.name(), fallback = ?state.fallback, "Feedscope proxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Feedscope proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
