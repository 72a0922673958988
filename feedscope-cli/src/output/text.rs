//! Text output formatting with colors.

use chrono::{DateTime, Utc};
use feedscope_core::{Category, DataOrigin, Listing, Post, PostMedia, format_count};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const FALLBACK_NOTICE: &str = "Showing sample posts: upstream is unavailable right now.";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    title_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            title_width: 80,
        }
    }

    /// Sets the width titles are truncated to.
    #[allow(dead_code)]
    pub fn with_title_width(mut self, width: usize) -> Self {
        self.title_width = width;
        self
    }

    /// Formats a whole feed.
    pub fn format_feed(&self, heading: &str, listing: &Listing) -> String {
        self.format_feed_at(heading, listing, Utc::now())
    }

    /// Formats a whole feed relative to `now`.
    pub fn format_feed_at(&self, heading: &str, listing: &Listing, now: DateTime<Utc>) -> String {
        let mut lines = vec![self.bold(heading), "─".repeat(50)];

        if listing.is_fallback() {
            lines.push(self.yellow(FALLBACK_NOTICE));
        }

        if listing.is_empty() {
            lines.push(self.dim("No posts found."));
            return lines.join("\n");
        }

        for (index, post) in listing.posts.iter().enumerate() {
            lines.push(self.format_post_line(index + 1, post, now));
        }

        if let Some(after) = &listing.after {
            lines.push(String::new());
            lines.push(self.dim(&format!("More posts after {after}")));
        }

        lines.join("\n")
    }

    /// Formats one post as a title line plus a meta line.
    pub fn format_post_line(&self, rank: usize, post: &Post, now: DateTime<Utc>) -> String {
        let mut title = truncate(&post.title, self.title_width);
        if post.stickied {
            title = format!("{} {title}", self.green("[pinned]"));
        }
        if post.over_18 {
            title = format!("{} {title}", self.red("[nsfw]"));
        }

        format!(
            "{:>3}. {}\n     {}",
            rank,
            title,
            self.dim(&self.meta_line(post, now))
        )
    }

    /// Formats a post in detail.
    pub fn format_post_detail(&self, post: &Post, origin: DataOrigin) -> String {
        let now = Utc::now();
        let mut lines = vec![self.bold(&post.title), self.meta_line(post, now), String::new()];

        if !post.selftext.is_empty() {
            lines.push(post.selftext.clone());
            lines.push(String::new());
        }

        match post.display_media() {
            PostMedia::Video { url, audio_url } => {
                lines.push(format!("Video:     {}", self.cyan(&url)));
                if let Some(audio) = audio_url {
                    lines.push(format!("Audio:     {}", self.cyan(&audio)));
                }
            }
            PostMedia::Thumbnail(url) => lines.push(format!("Thumbnail: {}", self.cyan(&url))),
            PostMedia::None => {}
        }
        if let Some(url) = post.url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(format!("Link:      {}", self.cyan(url)));
        }
        lines.push(format!("Comments:  {}", self.cyan(&post.permalink_url())));

        if origin == DataOrigin::Fallback {
            lines.push(String::new());
            lines.push(self.yellow(FALLBACK_NOTICE));
        }

        lines.join("\n")
    }

    /// Formats the category list header.
    pub fn format_categories_header(&self) -> String {
        format!(
            "{:<16} {:<16} {:<14} {}",
            self.bold("Key"),
            self.bold("Name"),
            self.bold("Subreddit"),
            self.bold("Description")
        )
    }

    /// Formats one category line.
    pub fn format_category_line(&self, category: &Category) -> String {
        format!(
            "{:<16} {:<16} {:<14} {}",
            category.key,
            category.display_name,
            format!("r/{}", category.subreddit),
            self.dim(category.description)
        )
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn meta_line(&self, post: &Post, now: DateTime<Utc>) -> String {
        let mut parts = vec![
            format!("r/{}", post.subreddit),
            format!("u/{}", post.author),
            format!("▲ {}", self.color_for_score(post.score)),
            format!("{} comments", format_count(i64::try_from(post.num_comments).unwrap_or(i64::MAX))),
        ];
        if let Some(created) = post.created_at() {
            parts.push(format_age(created, now));
        }
        if post.has_video() {
            parts.push("video".to_string());
        }
        parts.join(" · ")
    }

    fn color_for_score(&self, score: i64) -> String {
        let text = format_count(score);
        if score < 0 {
            self.red(&text)
        } else if score >= 1_000 {
            self.green(&text)
        } else {
            text
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats how long ago `then` was: `just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - then;
    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else if diff.num_days() < 365 {
        format!("{}d ago", diff.num_days())
    } else {
        format!("{}y ago", diff.num_days() / 365)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

// ============================================================================
// Tests
// ============================================================================
