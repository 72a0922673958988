//! The client data store.
//!
//! [`FeedStore`] owns the live [`FetchState`] behind a watch channel. Async
//! intents ([`FeedStore::fetch_listing`], [`FeedStore::search_posts`]) run
//! the retry policy against a [`ListingSource`] and commit the outcome;
//! sync intents apply one transition immediately.
//!
//! Each fetch records the state generation it started in. When
//! [`StoreOptions::discard_stale_results`] is set, a result that resolves
//! after a newer fetch or a category switch is dropped instead of
//! overwriting the newer state.

use std::sync::Arc;

use chrono::Utc;
use feedscope_core::{Category, Listing, ListingQuery, ListingTarget};
use feedscope_fetch::{ListingSource, RetryFailure, RetryPolicy};
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::state::{FetchState, Transition, reduce};

// ============================================================================
// Options
// ============================================================================

/// Store tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    /// Retry policy for listing fetches.
    pub listing_retry: RetryPolicy,
    /// Retry policy for searches.
    pub search_retry: RetryPolicy,
    /// Drop results whose generation is no longer current.
    pub discard_stale_results: bool,
    /// Query parameters sent with every fetch.
    pub query: ListingQuery,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            listing_retry: RetryPolicy::listing(),
            search_retry: RetryPolicy::search(),
            discard_stale_results: true,
            query: ListingQuery::default(),
        }
    }
}

impl StoreOptions {
    /// Replaces both retry policies.
    #[must_use]
    pub fn with_retry(mut self, listing: RetryPolicy, search: RetryPolicy) -> Self {
        self.listing_retry = listing;
        self.search_retry = search;
        self
    }

    /// Commits every result in resolution order, stale or not.
    #[must_use]
    pub fn last_resolution_wins(mut self) -> Self {
        self.discard_stale_results = false;
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.query.limit = ListingQuery::with_limit(limit).limit;
        self
    }
}

// ============================================================================
// Feed Store
// ============================================================================

/// Observable fetch state plus the intents that change it.
pub struct FeedStore {
    state: watch::Sender<FetchState>,
    source: Arc<dyn ListingSource>,
    options: StoreOptions,
}

impl std::fmt::Debug for FeedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedStore")
            .field("source", &self.source.name())
            .field("options", &self.options)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl FeedStore {
    /// Creates a store with default options.
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self::with_options(source, StoreOptions::default())
    }

    /// Creates a store with explicit options.
    pub fn with_options(source: Arc<dyn ListingSource>, options: StoreOptions) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            state,
            source,
            options,
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ========================================================================
    // Read Side
    // ========================================================================

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that is notified on every committed change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Returns the heading for the current state.
    pub fn heading(&self) -> String {
        self.state.borrow().heading()
    }

    // ========================================================================
    // Async Intents
    // ========================================================================

    /// Fetches the listing for the selected category.
    ///
    /// The category is read again on every attempt, so a switch during a
    /// backoff wait redirects the remaining attempts.
    #[instrument(skip(self))]
    pub async fn fetch_listing(&self) -> Result<Listing, RetryFailure> {
        let generation = self.begin(Transition::ListingRequested);
        let context = Category::display_name_for(&self.state.borrow().selected_category).to_string();
        let source = self.source.as_ref();
        let query = &self.options.query;

        let result = self
            .options
            .listing_retry
            .run(&context, |_| {
                let target = ListingTarget::for_category(&self.state.borrow().selected_category);
                async move { source.fetch_listing(&target, query).await }
            })
            .await;

        match &result {
            Ok(listing) => {
                info!(category = %context, posts = listing.len(), origin = listing.origin.as_str(), "Listing loaded");
                self.commit(generation, Transition::ListingLoaded(listing.clone()));
            }
            Err(failure) => {
                self.commit(
                    generation,
                    Transition::ListingFailed {
                        message: failure.message.clone(),
                        at: Utc::now(),
                    },
                );
            }
        }
        result
    }

    /// Searches for `query`.
    ///
    /// A blank query leaves search mode and fetches the category listing.
    #[instrument(skip(self))]
    pub async fn search_posts(&self, query: &str) -> Result<Listing, RetryFailure> {
        let term = query.trim();
        if term.is_empty() {
            debug!("Blank search, showing category listing");
            self.clear_search();
            return self.fetch_listing().await;
        }

        let generation = self.begin(Transition::SearchRequested);
        let context = format!("search for \"{term}\"");
        let target = ListingTarget::search(term);
        let source = self.source.as_ref();
        let params = &self.options.query;

        let result = self
            .options
            .search_retry
            .run(&context, |_| source.fetch_listing(&target, params))
            .await;

        match &result {
            Ok(listing) => {
                info!(query = term, posts = listing.len(), origin = listing.origin.as_str(), "Search loaded");
                self.commit(
                    generation,
                    Transition::SearchLoaded {
                        listing: listing.clone(),
                        query: term.to_string(),
                    },
                );
            }
            Err(failure) => {
                self.commit(
                    generation,
                    Transition::SearchFailed {
                        message: failure.message.clone(),
                        at: Utc::now(),
                    },
                );
            }
        }
        result
    }

    // ========================================================================
    // Sync Intents
    // ========================================================================

    /// Selects a category without fetching.
    pub fn set_category(&self, key: impl Into<String>) {
        self.apply(Transition::CategorySelected(key.into()));
    }

    /// Leaves search mode without fetching.
    pub fn clear_search(&self) {
        self.apply(Transition::SearchCleared);
    }

    /// Updates the draft search text without fetching.
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.apply(Transition::SearchQueryChanged(query.into()));
    }

    /// Dismisses the error and resets retry bookkeeping.
    pub fn clear_error(&self) {
        self.apply(Transition::ErrorCleared);
    }

    /// Drops the payload.
    pub fn clear_data(&self) {
        self.apply(Transition::DataCleared);
    }

    /// Counts one manual retry.
    pub fn increment_retry_count(&self) {
        self.apply(Transition::RetryCounted);
    }

    /// Resets the retry counter.
    pub fn reset_retry_count(&self) {
        self.apply(Transition::RetryCountReset);
    }

    // ========================================================================
    // Commit
    // ========================================================================

    fn apply(&self, transition: Transition) {
        self.state.send_modify(|state| *state = reduce(state, transition));
    }

    /// Applies a starting transition and returns the new generation.
    fn begin(&self, transition: Transition) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            *state = reduce(state, transition);
            generation = state.generation;
        });
        generation
    }

    /// Applies a result transition unless it belongs to an older generation.
    fn commit(&self, generation: u64, transition: Transition) -> bool {
        let discard_stale = self.options.discard_stale_results;
        self.state.send_if_modified(|state| {
            if discard_stale && state.generation != generation {
                debug!(
                    started = generation,
                    current = state.generation,
                    "Discarding stale result"
                );
                return false;
            }
            *state = reduce(state, transition);
            true
        })
    }
}
