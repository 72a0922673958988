//! Request targets and query strings.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use super::category::{Category, DEFAULT_TARGET};

/// Default page size.
pub const DEFAULT_LIMIT: u32 = 25;

/// Largest page size upstream accepts.
const MAX_LIMIT: u32 = 100;

/// Characters left alone by `encodeURIComponent`: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes one query component.
///
/// Spaces become `%20` (never `+`) and `&` becomes `%26`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

// ============================================================================
// Listing Target
// ============================================================================

/// What a listing request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ListingTarget {
    /// The default popular listing.
    Popular,
    /// One subreddit.
    Subreddit(String),
    /// Free-text search across everything.
    Search(String),
}

impl ListingTarget {
    /// Builds a subreddit target, normalising `popular` and stripping `.json`.
    pub fn subreddit(name: &str) -> Self {
        let name = name.trim().trim_end_matches(".json").trim_matches('/');
        let name = name.strip_prefix("r/").unwrap_or(name);
        if name.is_empty() || name.eq_ignore_ascii_case(DEFAULT_TARGET) {
            Self::Popular
        } else {
            Self::Subreddit(name.to_string())
        }
    }

    /// Resolves a category key through the catalog.
    pub fn for_category(key: &str) -> Self {
        Self::subreddit(Category::target_for(key))
    }

    /// Builds a search target.
    pub fn search(term: impl Into<String>) -> Self {
        Self::Search(term.into())
    }

    /// Returns the upstream path (leading slash, `.json` suffix).
    pub fn path(&self) -> String {
        match self {
            Self::Popular => format!("/r/{DEFAULT_TARGET}.json"),
            Self::Subreddit(name) => format!("/r/{}.json", encode_component(name)),
            Self::Search(_) => "/search.json".to_string(),
        }
    }

    /// Returns the label fallback data is generated for.
    pub fn fallback_label(&self) -> &str {
        match self {
            Self::Popular => DEFAULT_TARGET,
            Self::Subreddit(name) => name,
            Self::Search(_) => "demo",
        }
    }

    /// Returns true for search targets.
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }
}

impl fmt::Display for ListingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popular => write!(f, "r/{DEFAULT_TARGET}"),
            Self::Subreddit(name) => write!(f, "r/{name}"),
            Self::Search(term) => write!(f, "search \"{term}\""),
        }
    }
}

// ============================================================================
// Listing Query
// ============================================================================

/// Query parameters sent with a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    /// Page size.
    pub limit: u32,
    /// Other caller-supplied parameters, forwarded verbatim.
    #[serde(default)]
    pub extra: Vec<(String, String)>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            extra: Vec::new(),
        }
    }
}

impl ListingQuery {
    /// Creates a query with the given limit.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            ..Self::default()
        }
    }

    /// Builds a query from decoded request parameters.
    ///
    /// `q` is skipped since it belongs to the target and `raw_json` since
    /// it is always sent. Unparseable limits fall back to the default.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "limit" => {
                    query.limit = value
                        .parse::<u32>()
                        .map_or(DEFAULT_LIMIT, |n| n.clamp(1, MAX_LIMIT));
                }
                "q" | "raw_json" => {}
                _ => query.extra.push((key.to_string(), value.to_string())),
            }
        }
        query
    }

    /// Renders the query string (without `?`) for a target.
    ///
    /// Search terms come first, then `limit`, `raw_json=1` and the extras.
    /// Upstream must never HTML-escape text fields, so `raw_json=1` is
    /// always present.
    pub fn to_query_string(&self, target: &ListingTarget) -> String {
        let mut parts = Vec::with_capacity(3 + self.extra.len());
        if let ListingTarget::Search(term) = target {
            parts.push(format!("q={}", encode_component(term)));
        }
        parts.push(format!("limit={}", self.limit));
        parts.push("raw_json=1".to_string());
        for (key, value) in &self.extra {
            parts.push(format!("{}={}", encode_component(key), encode_component(value)));
        }
        parts.join("&")
    }
}

// ============================================================================
// Tests
// ============================================================================
