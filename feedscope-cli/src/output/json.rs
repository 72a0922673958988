//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use feedscope_core::{Category, Listing, Post, PostMedia};
use feedscope_store::FetchState;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedOutput {
    pub heading: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    pub posts: Vec<PostOutput>,
}

/// A single post.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOutput {
    pub id: String,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub num_comments: u64,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub created_at: Option<DateTime<Utc>>,
    pub permalink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaOutput>,
    pub over_18: bool,
    pub stickied: bool,
}

/// What a viewer should render as the post's media.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MediaOutput {
    #[serde(rename_all = "camelCase")]
    Video {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        audio_url: Option<String>,
    },
    Thumbnail {
        url: String,
    },
}

/// Catalog entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOutput {
    pub key: String,
    pub display_name: String,
    pub subreddit: String,
    pub description: String,
}

impl From<&Post> for PostOutput {
    fn from(post: &Post) -> Self {
        let media = match post.display_media() {
            PostMedia::Video { url, audio_url } => Some(MediaOutput::Video { url, audio_url }),
            PostMedia::Thumbnail(url) => Some(MediaOutput::Thumbnail { url }),
            PostMedia::None => None,
        };
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            subreddit: post.subreddit.clone(),
            score: post.score,
            num_comments: post.num_comments,
            created_at: post.created_at(),
            permalink: post.permalink_url(),
            url: post.url.clone(),
            media,
            over_18: post.over_18,
            stickied: post.stickied,
        }
    }
}

impl From<&Category> for CategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            key: category.key.to_string(),
            display_name: category.display_name.to_string(),
            subreddit: category.subreddit.to_string(),
            description: category.description.to_string(),
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a feed together with the state that produced it.
    pub fn format_feed(&self, state: &FetchState, listing: &Listing) -> Result<String> {
        self.format(&feed_output(state, listing))
    }

    /// Formats one post.
    pub fn format_post(&self, post: &Post) -> Result<String> {
        self.format(&PostOutput::from(post))
    }

    /// Formats the category catalog.
    pub fn format_categories(&self, categories: &[Category]) -> Result<String> {
        let outputs: Vec<CategoryOutput> = categories.iter().map(CategoryOutput::from).collect();
        self.format(&outputs)
    }
}

/// Builds the feed output.
pub fn feed_output(state: &FetchState, listing: &Listing) -> FeedOutput {
    FeedOutput {
        heading: state.heading(),
        category: state.selected_category.clone(),
        search_query: state
            .is_searching
            .then(|| state.search_query.clone())
            .filter(|q| !q.is_empty()),
        origin: listing.origin.as_str().to_string(),
        after: listing.after.clone(),
        posts: listing.posts.iter().map(PostOutput::from).collect(),
    }
}
