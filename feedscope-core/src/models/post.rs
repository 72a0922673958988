//! Post-related types.
//!
//! A [`Post`] is a read-only projection of the upstream item fields needed
//! for rendering. Fields the views do not use are kept in [`Post::extra`] so
//! that re-serializing a post reproduces what upstream sent.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base used to turn relative permalinks into absolute links.
const PERMALINK_BASE: &str = "https://www.reddit.com";

// ============================================================================
// Post
// ============================================================================

/// One content item with engagement metrics and optional media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Upstream id (without the `t3_` prefix).
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Author username.
    #[serde(default)]
    pub author: String,
    /// Subreddit the post belongs to.
    #[serde(default)]
    pub subreddit: String,
    /// Net upvotes.
    #[serde(default)]
    pub score: i64,
    /// Number of comments.
    #[serde(default)]
    pub num_comments: u64,
    /// Creation time in epoch seconds.
    #[serde(default)]
    pub created_utc: f64,
    /// Relative permalink (e.g. `/r/rust/comments/abc/title/`).
    #[serde(default)]
    pub permalink: String,
    /// Link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Self text body (empty for link posts).
    #[serde(default)]
    pub selftext: String,
    /// Whether upstream marks this as a hosted video.
    #[serde(default)]
    pub is_video: bool,
    /// NSFW flag.
    #[serde(default)]
    pub over_18: bool,
    /// Pinned by moderators.
    #[serde(default)]
    pub stickied: bool,
    /// Link domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Thumbnail URL or a placeholder keyword (`self`, `default`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Media descriptor.
    #[serde(default)]
    pub media: Option<Media>,
    /// Secure media descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure_media: Option<Media>,
    /// Every other upstream field, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Upstream media block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Natively hosted video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reddit_video: Option<RedditVideo>,
    /// Embedded third-party content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Oembed>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Natively hosted video streams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedditVideo {
    /// Progressive MP4 URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    /// DASH manifest URL (carries the audio track).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_url: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Embedded third-party content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Oembed {
    /// Embed type (`video`, `rich`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Embed URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What a view should show as the post's media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostMedia {
    /// Playable video.
    Video {
        /// Video stream URL.
        url: String,
        /// Separate audio (DASH) URL, if any.
        audio_url: Option<String>,
    },
    /// Preview image.
    Thumbnail(String),
    /// Nothing to show.
    None,
}

impl Post {
    /// Creates a post with the given id and title and empty everything else.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            subreddit: String::new(),
            score: 0,
            num_comments: 0,
            created_utc: 0.0,
            permalink: String::new(),
            url: None,
            selftext: String::new(),
            is_video: false,
            over_18: false,
            stickied: false,
            domain: None,
            thumbnail: None,
            media: None,
            secure_media: None,
            extra: Map::new(),
        }
    }

    /// Returns the creation time, if the timestamp is representable.
    #[allow(clippy::cast_possible_truncation)]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_utc as i64, 0).single()
    }

    /// Returns the absolute permalink.
    pub fn permalink_url(&self) -> String {
        if self.permalink.starts_with("http") {
            self.permalink.clone()
        } else {
            format!("{PERMALINK_BASE}{}", self.permalink)
        }
    }

    /// Returns the playable video URL.
    ///
    /// Hosted video wins over embeds, which win over `secure_media`.
    pub fn video_url(&self) -> Option<&str> {
        if self.is_video {
            if let Some(url) = hosted_video(self.media.as_ref()) {
                return Some(url);
            }
        }
        if let Some(url) = self
            .media
            .as_ref()
            .and_then(|m| m.oembed.as_ref())
            .and_then(|o| o.url.as_deref())
        {
            return Some(url);
        }
        hosted_video(self.secure_media.as_ref())
    }

    /// Returns the DASH URL that carries the audio track.
    pub fn audio_url(&self) -> Option<&str> {
        [self.media.as_ref(), self.secure_media.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|m| m.reddit_video.as_ref()?.dash_url.as_deref())
    }

    /// Returns true if the post carries any kind of video.
    pub fn has_video(&self) -> bool {
        let hosted = |m: Option<&Media>| m.is_some_and(|m| m.reddit_video.is_some());
        let embedded = self
            .media
            .as_ref()
            .and_then(|m| m.oembed.as_ref())
            .is_some_and(|o| o.kind.as_deref() == Some("video"));

        self.is_video || hosted(self.media.as_ref()) || hosted(self.secure_media.as_ref()) || embedded
    }

    /// Returns the media a view should render.
    pub fn display_media(&self) -> PostMedia {
        if self.has_video() {
            if let Some(url) = self.video_url() {
                return PostMedia::Video {
                    url: url.to_string(),
                    audio_url: self.audio_url().map(str::to_string),
                };
            }
        }
        match self.thumbnail.as_deref() {
            Some(thumb) if thumb.starts_with("http://") || thumb.starts_with("https://") => {
                PostMedia::Thumbnail(thumb.to_string())
            }
            _ => PostMedia::None,
        }
    }
}

fn hosted_video(media: Option<&Media>) -> Option<&str> {
    media?.reddit_video.as_ref()?.fallback_url.as_deref()
}

/// Formats a count compactly: `950`, `1.2K`, `3.4M`.
#[allow(clippy::cast_precision_loss)]
pub fn format_count(n: i64) -> String {
    let abs = n.unsigned_abs();
    if abs >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
