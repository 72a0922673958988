//! Static sample data served when upstream is unavailable.

use chrono::Utc;
use feedscope_core::{DataOrigin, Listing, Post};

/// Label used for search fallbacks.
pub const SEARCH_FALLBACK_LABEL: &str = "demo";

const MOCK_MODHASH: &str = "mock_modhash";
const MOCK_THUMBNAIL: &str = "https://b.thumbs.redditmedia.com/example.jpg";

/// Returns the sample listing for `label`, stamped relative to now.
pub fn mock_listing(label: &str) -> Listing {
    mock_listing_at(label, Utc::now().timestamp())
}

struct Sample {
    id: &'static str,
    author: &'static str,
    score: i64,
    num_comments: u64,
    age_hours: i64,
    path: &'static str,
}

const SAMPLES: [Sample; 3] = [
    Sample {
        id: "mock1",
        author: "reddit_user",
        score: 15_420,
        num_comments: 892,
        age_hours: 1,
        path: "",
    },
    Sample {
        id: "mock2",
        author: "demo_user",
        score: 8_920,
        num_comments: 234,
        age_hours: 2,
        path: "comments/example/",
    },
    Sample {
        id: "mock3",
        author: "content_creator",
        score: 5_670,
        num_comments: 456,
        age_hours: 3,
        path: "comments/example2/",
    },
];

fn sample_text(id: &str, label: &str) -> (String, String) {
    match id {
        "mock1" => (
            format!("Welcome to r/{label}! 🎉"),
            format!(
                "This is a demo of the Reddit {label} posts. Set up Reddit API credentials to see real data!"
            ),
        ),
        "mock2" => (
            format!("Sample post from r/{label} 📝"),
            "This is sample data while Reddit API credentials are being set up.".to_string(),
        ),
        _ => (
            format!("Another interesting post in r/{label} 🔍"),
            "More sample content to demonstrate the app functionality.".to_string(),
        ),
    }
}

/// Returns the sample listing for `label` with timestamps relative to `now`.
///
/// Three posts, one, two and three hours old. Every post's `subreddit`
/// equals `label`, cursors are null and the origin is
/// [`DataOrigin::Fallback`].
#[allow(clippy::cast_precision_loss)]
pub fn mock_listing_at(label: &str, now: i64) -> Listing {
    let posts = SAMPLES
        .iter()
        .map(|sample| {
            let (title, selftext) = sample_text(sample.id, label);
            let mut post = Post::new(sample.id, title);
            post.author = sample.author.to_string();
            post.score = sample.score;
            post.num_comments = sample.num_comments;
            post.created_utc = (now - sample.age_hours * 3600) as f64;
            post.permalink = format!("/r/{label}/{}", sample.path);
            post.url = Some(format!("https://www.reddit.com/r/{label}/{}", sample.path));
            post.subreddit = label.to_string();
            post.selftext = selftext;
            post.thumbnail = Some(MOCK_THUMBNAIL.to_string());
            post
        })
        .collect();

    let mut listing = Listing::new(posts).with_origin(DataOrigin::Fallback);
    listing.modhash = Some(MOCK_MODHASH.to_string());
    listing
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_interpolated() {
        let listing = mock_listing_at("technology", 1_700_000_000);

        assert_eq!(listing.len(), 3);
        assert!(listing.is_fallback());
        assert!(listing.posts.iter().all(|p| p.subreddit == "technology"));
        assert!(listing.posts[0].title.contains("r/technology"));
        assert_eq!(listing.posts[1].permalink, "/r/technology/comments/example/");
    }

    #[test]
    fn test_cursors_and_modhash() {
        let listing = mock_listing("popular");
        assert!(listing.after.is_none());
        assert!(listing.before.is_none());
        assert_eq!(listing.modhash.as_deref(), Some("mock_modhash"));
    }

    #[test]
    fn test_timestamps_are_relative_to_now() {
        let listing = mock_listing_at(SEARCH_FALLBACK_LABEL, 10_000_000);
        let ages: Vec<f64> = listing.posts.iter().map(|p| p.created_utc).collect();
        assert_eq!(ages, vec![9_996_400.0, 9_992_800.0, 9_989_200.0]);
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(mock_listing_at("demo", 0)).unwrap();
        assert_eq!(value["data"]["children"].as_array().unwrap().len(), 3);
        assert_eq!(value["data"]["modhash"], "mock_modhash");
        assert!(value["data"]["after"].is_null());
        assert_eq!(value["data"]["children"][0]["data"]["subreddit"], "demo");
    }
}
