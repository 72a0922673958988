//! Listing envelope.
//!
//! On the wire a listing is the upstream envelope:
//!
//! ```json
//! {
//!   "kind": "Listing",
//!   "data": {
//!     "children": [{"kind": "t3", "data": {"id": "abc", "title": "..."}}],
//!     "after": "t3_abc",
//!     "before": null,
//!     "modhash": ""
//!   }
//! }
//! ```
//!
//! In memory it is flattened into [`Listing`]. A listing parsed from an
//! upstream body keeps that body and serializes back to it unchanged.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::post::Post;
use crate::error::CoreError;

const LISTING_KIND: &str = "Listing";
const POST_KIND: &str = "t3";

// ============================================================================
// Data Origin
// ============================================================================

/// Where a listing's content came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Fetched from the upstream API.
    #[default]
    Upstream,
    /// Substitute data served because upstream was unavailable.
    Fallback,
}

impl DataOrigin {
    /// Returns the header/label form of this origin.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Fallback => "fallback",
        }
    }

    /// Parses the header/label form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upstream" => Some(Self::Upstream),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }
}

// ============================================================================
// Listing
// ============================================================================

/// A page of posts plus pagination cursors, in upstream order.
///
/// A listing from [`Listing::from_value`] serializes as the body it was
/// parsed from, so edits to its fields do not reach the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Posts in upstream order.
    pub posts: Vec<Post>,
    /// Cursor for the next page.
    pub after: Option<String>,
    /// Cursor for the previous page.
    pub before: Option<String>,
    /// Upstream modhash, passed through.
    pub modhash: Option<String>,
    /// Other `data`-level fields (`dist`, `geo_filter`, ...), passed through.
    pub extra: Map<String, Value>,
    /// Where this listing came from. Not part of the wire body.
    pub origin: DataOrigin,
    /// The upstream body this listing was parsed from.
    raw: Option<Value>,
}

impl Listing {
    /// Creates an upstream listing with no cursors.
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts,
            after: None,
            before: None,
            modhash: None,
            extra: Map::new(),
            origin: DataOrigin::Upstream,
            raw: None,
        }
    }

    /// Parses and validates an upstream body.
    ///
    /// Fails with [`CoreError::Serialization`] for non-JSON input and
    /// [`CoreError::InvalidListing`] when `data.children` is missing.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Validates and converts an already parsed body.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let has_children = value
            .get("data")
            .and_then(|data| data.get("children"))
            .is_some_and(Value::is_array);
        if !has_children {
            return Err(CoreError::InvalidListing(
                "expected an object with data.children".to_string(),
            ));
        }
        let envelope = ListingEnvelope::deserialize(&value)
            .map_err(|e| CoreError::InvalidListing(e.to_string()))?;
        let mut listing = Self::from(envelope);
        listing.raw = Some(value);
        Ok(listing)
    }

    /// Returns the upstream body, if this listing was parsed from one.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: DataOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Returns true if this is substitute data.
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }

    /// Number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns true if there are no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Finds a post by id (with or without the `t3_` prefix).
    pub fn find_post(&self, id: &str) -> Option<&Post> {
        let id = id.strip_prefix("t3_").unwrap_or(id);
        self.posts.iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Wire Envelope
// ============================================================================

#[derive(Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    children: Vec<Thing>,
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    before: Option<String>,
    #[serde(default)]
    modhash: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct Thing {
    data: Post,
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    kind: &'static str,
    data: DataOut<'a>,
}

#[derive(Serialize)]
struct DataOut<'a> {
    children: Vec<ThingOut<'a>>,
    after: &'a Option<String>,
    before: &'a Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modhash: &'a Option<String>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct ThingOut<'a> {
    kind: &'static str,
    data: &'a Post,
}

impl From<ListingEnvelope> for Listing {
    fn from(envelope: ListingEnvelope) -> Self {
        let data = envelope.data;
        Self {
            posts: data.children.into_iter().map(|thing| thing.data).collect(),
            after: data.after,
            before: data.before,
            modhash: data.modhash,
            extra: data.extra,
            origin: DataOrigin::Upstream,
            raw: None,
        }
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(raw) = &self.raw {
            return raw.serialize(serializer);
        }
        EnvelopeOut {
            kind: LISTING_KIND,
            data: DataOut {
                children: self
                    .posts
                    .iter()
                    .map(|data| ThingOut {
                        kind: POST_KIND,
                        data,
                    })
                    .collect(),
                after: &self.after,
                before: &self.before,
                modhash: &self.modhash,
                extra: &self.extra,
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Listing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}
