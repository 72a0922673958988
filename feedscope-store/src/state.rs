//! Fetch state and its reducer.
//!
//! [`FetchState`] is a plain value. Every change goes through [`reduce`],
//! which takes the old state and a [`Transition`] and returns the new one.
//! [`FeedStore`](crate::FeedStore) owns the single live instance.

use chrono::{DateTime, Utc};
use feedscope_core::{Category, DEFAULT_CATEGORY, Listing};
use serde::Serialize;

// ============================================================================
// Fetch State
// ============================================================================

/// Everything a view needs to render the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchState {
    /// Last successfully fetched listing.
    pub payload: Option<Listing>,
    /// A fetch is in flight.
    pub loading: bool,
    /// User-facing error from the last failed fetch.
    pub error: Option<String>,
    /// Search text (draft while typing, the literal query after a search).
    pub search_query: String,
    /// The payload (or pending fetch) is a search.
    pub is_searching: bool,
    /// Selected category key.
    pub selected_category: String,
    /// Manual retries since the last success.
    pub retry_count: u32,
    /// When the last fetch failed.
    pub last_error_time: Option<DateTime<Utc>>,
    /// Bumped whenever a newer request makes older results irrelevant.
    pub generation: u64,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            payload: None,
            loading: false,
            error: None,
            search_query: String::new(),
            is_searching: false,
            selected_category: DEFAULT_CATEGORY.to_string(),
            retry_count: 0,
            last_error_time: None,
            generation: 0,
        }
    }
}

impl FetchState {
    /// Returns the catalog entry for the selected category, if known.
    pub fn category(&self) -> Option<&'static Category> {
        Category::find(&self.selected_category)
    }

    /// Returns the heading a view shows above the feed.
    pub fn heading(&self) -> String {
        if self.is_searching && !self.search_query.is_empty() {
            format!("Search Results for \"{}\"", self.search_query)
        } else {
            Category::display_name_for(&self.selected_category).to_string()
        }
    }

    /// Derives what a view should render.
    pub fn view(&self) -> FeedView<'_> {
        if self.loading {
            return FeedView::Loading {
                previous: self.payload.as_ref(),
            };
        }
        if let Some(error) = &self.error {
            return FeedView::Failed { message: error };
        }
        match &self.payload {
            None => FeedView::Idle,
            Some(listing) if listing.is_empty() => FeedView::Empty,
            Some(listing) => FeedView::Ready { listing },
        }
    }
}

/// Render state derived from a [`FetchState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedView<'a> {
    /// Nothing fetched yet.
    Idle,
    /// A fetch is in flight; the previous payload may still be shown.
    Loading {
        /// Payload from before the fetch started.
        previous: Option<&'a Listing>,
    },
    /// The last fetch failed.
    Failed {
        /// User-facing message.
        message: &'a str,
    },
    /// The fetch succeeded with no posts.
    Empty,
    /// Posts to show.
    Ready {
        /// The listing.
        listing: &'a Listing,
    },
}

// ============================================================================
// Transitions
// ============================================================================

/// One state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A listing fetch began.
    ListingRequested,
    /// A listing fetch succeeded.
    ListingLoaded(Listing),
    /// A listing fetch failed after all attempts.
    ListingFailed {
        /// User-facing message.
        message: String,
        /// Failure time.
        at: DateTime<Utc>,
    },
    /// A search began.
    SearchRequested,
    /// A search succeeded.
    SearchLoaded {
        /// Results.
        listing: Listing,
        /// The query that produced them.
        query: String,
    },
    /// A search failed after all attempts.
    SearchFailed {
        /// User-facing message.
        message: String,
        /// Failure time.
        at: DateTime<Utc>,
    },
    /// A category was chosen.
    CategorySelected(String),
    /// Search mode was left.
    SearchCleared,
    /// The search text changed (no fetch).
    SearchQueryChanged(String),
    /// The error was dismissed.
    ErrorCleared,
    /// The payload was dropped.
    DataCleared,
    /// One more retry was made.
    RetryCounted,
    /// Retry bookkeeping was reset.
    RetryCountReset,
}

impl Transition {
    /// Returns true if this transition makes in-flight results stale.
    pub fn starts_generation(&self) -> bool {
        matches!(
            self,
            Self::ListingRequested | Self::SearchRequested | Self::CategorySelected(_)
        )
    }
}

/// Applies one transition.
pub fn reduce(state: &FetchState, transition: Transition) -> FetchState {
    let mut next = state.clone();
    if transition.starts_generation() {
        next.generation += 1;
    }

    match transition {
        Transition::ListingRequested => {
            next.loading = true;
            next.error = None;
        }
        Transition::ListingLoaded(listing) => {
            next.loading = false;
            next.payload = Some(listing);
            next.error = None;
            next.is_searching = false;
            next.retry_count = 0;
            next.last_error_time = None;
        }
        Transition::ListingFailed { message, at } => {
            next.loading = false;
            next.error = Some(message);
            next.last_error_time = Some(at);
        }
        Transition::SearchRequested => {
            next.loading = true;
            next.is_searching = true;
            next.error = None;
        }
        Transition::SearchLoaded { listing, query } => {
            next.loading = false;
            next.payload = Some(listing);
            next.search_query = query;
            next.is_searching = true;
            next.error = None;
            next.retry_count = 0;
            next.last_error_time = None;
        }
        Transition::SearchFailed { message, at } => {
            next.loading = false;
            next.is_searching = false;
            next.error = Some(message);
            next.last_error_time = Some(at);
        }
        Transition::CategorySelected(key) => {
            next.selected_category = key;
            next.is_searching = false;
            next.search_query.clear();
            next.error = None;
            // Whatever was in flight belongs to the previous generation.
            next.loading = false;
        }
        Transition::SearchCleared => {
            next.search_query.clear();
            next.is_searching = false;
            next.error = None;
        }
        Transition::SearchQueryChanged(query) => next.search_query = query,
        Transition::ErrorCleared => {
            next.error = None;
            next.retry_count = 0;
            next.last_error_time = None;
        }
        Transition::DataCleared => next.payload = None,
        Transition::RetryCounted => next.retry_count += 1,
        Transition::RetryCountReset => next.retry_count = 0,
    }
    next
}

// ============================================================================
// Tests
// ============================================================================
