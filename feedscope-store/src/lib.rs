// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Feedscope Store
//!
//! Client-side state for the Feedscope viewer.
//!
//! This crate provides:
//!
//! - **FeedStore**: the fetch state machine behind a watch channel
//! - **Config**: file and environment configuration
//! - **Persistence**: JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use feedscope_fetch::ProxyClient;
//! use feedscope_store::FeedStore;
//!
//! let store = FeedStore::new(Arc::new(ProxyClient::new("http://127.0.0.1:3000")?));
//!
//! store.set_category("technology");
//! store.fetch_listing().await?;
//!
//! let mut rx = store.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("{}", rx.borrow().heading());
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed_store;
pub mod persistence;
pub mod state;

pub use config::{ClientConfig, Config, ProxyConfig, UpstreamConfig};
pub use error::StoreError;
pub use feed_store::{FeedStore, StoreOptions};
pub use persistence::{default_config_dir, ensure_dir, load_json, load_json_or_default, save_json};
pub use state::{FeedView, FetchState, Transition, reduce};

#[cfg(test)]
mod persistence_tests;
