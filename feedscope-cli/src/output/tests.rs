//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use chrono::{TimeZone, Utc};
    use feedscope_core::{Category, DataOrigin, Listing, Media, Post, RedditVideo};
    use feedscope_fetch::mock_listing_at;

    fn post(id: &str, title: &str) -> Post {
        let mut post = Post::new(id, title);
        post.subreddit = "rust".into();
        post.author = "ferris".into();
        post.score = 1234;
        post.num_comments = 56;
        post.created_utc = 1_700_000_000.0;
        post.permalink = format!("/r/rust/comments/{id}/");
        post
    }

    #[test]
    fn test_feed_lists_posts_in_order() {
        let formatter = TextFormatter::new(false);
        let listing = Listing::new(vec![post("a", "First"), post("b", "Second")]);
        let now = Utc.timestamp_opt(1_700_000_000 + 3 * 3600, 0).unwrap();

        let output = formatter.format_feed_at("Technology", &listing, now);

        assert!(output.starts_with("Technology\n"));
        let first = output.find("1. First").unwrap();
        let second = output.find("2. Second").unwrap();
        assert!(first < second);
        assert!(output.contains("r/rust · u/ferris · ▲ 1.2K · 56 comments · 3h ago"));
        assert!(!output.contains("sample posts"));
    }

    #[test]
    fn test_fallback_feed_carries_notice() {
        let formatter = TextFormatter::new(false);
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let listing = mock_listing_at("gaming", now.timestamp());

        let output = formatter.format_feed_at("Gaming", &listing, now);

        assert!(output.contains("Showing sample posts"));
        assert!(output.contains("r/gaming"));
    }

    #[test]
    fn test_empty_feed() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_feed("Search Results for \"zzz\"", &Listing::new(Vec::new()));
        assert!(output.contains("No posts found."));
    }

    #[test]
    fn test_pagination_hint() {
        let formatter = TextFormatter::new(false);
        let mut listing = Listing::new(vec![post("a", "First")]);
        listing.after = Some("t3_a".into());

        assert!(formatter.format_feed("All Posts", &listing).contains("More posts after t3_a"));
    }

    #[test]
    fn test_long_titles_are_truncated() {
        let formatter = TextFormatter::new(false).with_title_width(10);
        let now = Utc::now();
        let line = formatter.format_post_line(1, &post("a", "A very long title indeed"), now);
        assert!(line.contains("A very lo…"));
    }

    #[test]
    fn test_post_detail_shows_video_and_links() {
        let formatter = TextFormatter::new(false);
        let mut post = post("v1", "Cat video");
        post.is_video = true;
        post.media = Some(Media {
            reddit_video: Some(RedditVideo {
                fallback_url: Some("https://v.redd.it/v1/DASH_720.mp4".into()),
                dash_url: Some("https://v.redd.it/v1/DASHPlaylist.mpd".into()),
                ..RedditVideo::default()
            }),
            ..Media::default()
        });

        let output = formatter.format_post_detail(&post, DataOrigin::Upstream);

        assert!(output.contains("Video:     https://v.redd.it/v1/DASH_720.mp4"));
        assert!(output.contains("Audio:     https://v.redd.it/v1/DASHPlaylist.mpd"));
        assert!(output.contains("Comments:  https://www.reddit.com/r/rust/comments/v1/"));
        assert!(!output.contains("sample posts"));
    }

    #[test]
    fn test_category_line() {
        let formatter = TextFormatter::new(false);
        let technology = Category::find("technology").unwrap();
        let line = formatter.format_category_line(technology);
        assert!(line.starts_with("technology"));
        assert!(line.contains("r/technology"));
    }

    #[test]
    fn test_flags_are_colored() {
        let formatter = TextFormatter::new(true);
        let mut pinned = post("p", "Rules");
        pinned.stickied = true;
        let line = formatter.format_post_line(1, &pinned, Utc::now());
        assert!(line.contains("\x1b[32m[pinned]"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, feed_output};
    use feedscope_core::{Category, DataOrigin, Listing, Post};
    use feedscope_store::{FetchState, Transition, reduce};
    use serde_json::Value;

    fn listing() -> Listing {
        let mut post = Post::new("abc", "Hello");
        post.subreddit = "science".into();
        post.thumbnail = Some("https://b.thumbs.redditmedia.com/x.jpg".into());
        post.created_utc = 1_700_000_000.0;
        Listing::new(vec![post, Post::new("def", "World")])
    }

    #[test]
    fn test_feed_output_for_category() {
        let state = reduce(&FetchState::default(), Transition::CategorySelected("science".into()));
        let output = feed_output(&state, &listing());

        assert_eq!(output.heading, "Science");
        assert_eq!(output.category, "science");
        assert!(output.search_query.is_none());
        assert_eq!(output.origin, "upstream");
        assert_eq!(output.posts.len(), 2);
    }

    #[test]
    fn test_feed_output_for_search() {
        let state = reduce(
            &FetchState::default(),
            Transition::SearchLoaded {
                listing: listing(),
                query: "cats".into(),
            },
        );
        let output = feed_output(&state, &listing().with_origin(DataOrigin::Fallback));

        assert_eq!(output.search_query.as_deref(), Some("cats"));
        assert_eq!(output.heading, "Search Results for \"cats\"");
        assert_eq!(output.origin, "fallback");
    }

    #[test]
    fn test_feed_json_shape() {
        let formatter = JsonFormatter::new(false);
        let json = formatter.format_feed(&FetchState::default(), &listing()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["category"], "all");
        assert_eq!(value["posts"][0]["id"], "abc");
        assert_eq!(value["posts"][0]["numComments"], 0);
        assert_eq!(value["posts"][0]["media"]["kind"], "thumbnail");
        assert!(value["posts"][0]["createdAt"].as_str().unwrap().starts_with("2023-11-14"));
        assert!(value["posts"][1].get("media").is_none());
        assert!(value.get("searchQuery").is_none());
    }

    #[test]
    fn test_pretty_output_is_multiline() {
        let formatter = JsonFormatter::new(true);
        let json = formatter.format_post(&Post::new("x", "y")).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_categories_json() {
        let formatter = JsonFormatter::new(false);
        let json = formatter.format_categories(Category::all()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), Category::all().len());
        assert_eq!(entries[0]["key"], "all");
        assert_eq!(entries[0]["displayName"], "All Posts");
    }
}
