//! Serde tests for the listing envelope and posts.
//!
//! These check that upstream bodies parse into the flattened model and that
//! re-serializing keeps the envelope shape and unknown fields.

use serde_json::json;

use crate::{CoreError, DataOrigin, Listing, Post};

fn upstream_body() -> serde_json::Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": "t3_b2",
            "before": null,
            "dist": 2,
            "modhash": "",
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "a1",
                        "title": "First",
                        "author": "alice",
                        "subreddit": "rust",
                        "score": 1520,
                        "num_comments": 87,
                        "created_utc": 1700000000.0,
                        "permalink": "/r/rust/comments/a1/first/",
                        "url": "https://example.com/a1",
                        "selftext": "",
                        "is_video": false,
                        "over_18": false,
                        "stickied": true,
                        "domain": "example.com",
                        "thumbnail": "self",
                        "media": null,
                        "link_flair_text": "News",
                        "ups": 1520
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "b2",
                        "title": "Second",
                        "author": "bob",
                        "subreddit": "rust",
                        "score": 12,
                        "num_comments": 3,
                        "created_utc": 1700000100,
                        "permalink": "/r/rust/comments/b2/second/",
                        "is_video": true,
                        "media": {
                            "reddit_video": {
                                "fallback_url": "https://v.redd.it/b2/DASH_720.mp4",
                                "dash_url": "https://v.redd.it/b2/DASHPlaylist.mpd",
                                "duration": 31
                            }
                        }
                    }
                }
            ]
        }
    })
}

// ============================================================================
// Listing Parsing Tests
// ============================================================================

#[test]
fn test_listing_parses_upstream_body() {
    let listing = Listing::from_value(upstream_body()).unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing.after.as_deref(), Some("t3_b2"));
    assert!(listing.before.is_none());
    assert_eq!(listing.origin, DataOrigin::Upstream);

    let first = &listing.posts[0];
    assert_eq!(first.id, "a1");
    assert_eq!(first.score, 1520);
    assert!(first.stickied);
    assert_eq!(first.extra.get("link_flair_text"), Some(&json!("News")));

    let second = listing.find_post("t3_b2").unwrap();
    assert!(second.has_video());
    assert_eq!(second.video_url(), Some("https://v.redd.it/b2/DASH_720.mp4"));
}

#[test]
fn test_listing_reserializes_envelope_and_extras() {
    let listing = Listing::from_value(upstream_body()).unwrap();
    let value = serde_json::to_value(&listing).unwrap();

    assert_eq!(value["kind"], "Listing");
    assert_eq!(value["data"]["dist"], 2);
    assert_eq!(value["data"]["children"][0]["kind"], "t3");
    assert_eq!(value["data"]["children"][0]["data"]["ups"], 1520);
    assert_eq!(
        value["data"]["children"][1]["data"]["media"]["reddit_video"]["duration"],
        31
    );
    // Origin is transport metadata, never part of the body.
    assert!(value.get("origin").is_none());
}

#[test]
fn test_parsed_listing_reserializes_to_the_upstream_body() {
    let body = json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "children": [{
                "kind": "t3",
                "data": {
                    "id": "a",
                    "title": "t",
                    "created_utc": 1700000000,
                    "secure_media": null,
                    "url": null,
                    "media": null,
                    "domain": "self.rust"
                }
            }]
        }
    });

    let listing = Listing::from_value(body.clone()).unwrap();
    assert_eq!(listing.raw(), Some(&body));
    assert_eq!(serde_json::to_value(&listing).unwrap(), body);

    let text = serde_json::to_string(&listing).unwrap();
    let reparsed: Listing = serde_json::from_str(&text).unwrap();
    assert_eq!(serde_json::to_value(&reparsed).unwrap(), body);
}

#[test]
fn test_constructed_listing_serializes_typed_envelope() {
    let mut listing = Listing::new(vec![Post::new("n1", "Built")]);
    listing.modhash = Some("m".into());
    assert!(listing.raw().is_none());

    let value = serde_json::to_value(&listing).unwrap();
    assert_eq!(value["kind"], "Listing");
    assert_eq!(value["data"]["children"][0]["kind"], "t3");
    assert_eq!(value["data"]["children"][0]["data"]["id"], "n1");
    assert_eq!(value["data"]["modhash"], "m");
    assert!(value["data"]["after"].is_null());
}

#[test]
fn test_listing_requires_children() {
    let err = Listing::from_value(json!({"data": {"after": null}})).unwrap_err();
    assert!(matches!(err, CoreError::InvalidListing(_)));

    let err = Listing::from_value(json!({"error": 403, "message": "Forbidden"})).unwrap_err();
    assert!(matches!(err, CoreError::InvalidListing(_)));
}

#[test]
fn test_listing_rejects_non_json() {
    let err = Listing::from_slice(b"<html>rate limited</html>").unwrap_err();
    assert!(matches!(err, CoreError::Serialization(_)));
}

#[test]
fn test_post_without_id_is_invalid() {
    let body = json!({"data": {"children": [{"kind": "t3", "data": {"title": "no id"}}]}});
    let err = Listing::from_value(body).unwrap_err();
    assert!(matches!(err, CoreError::InvalidListing(_)));
}

#[test]
fn test_post_defaults_for_sparse_items() {
    let post: Post = serde_json::from_value(json!({"id": "x"})).unwrap();
    assert_eq!(post.title, "");
    assert_eq!(post.score, 0);
    assert!(!post.is_video);
    assert!(post.media.is_none());
}
