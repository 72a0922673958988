use feedscope_core::{ListingQuery, ListingTarget};
use feedscope_fetch::{FailureCategory, ListingSource, ORIGIN_HEADER, ProxyClient, mock_listing_at};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn body() -> serde_json::Value {
    json!({
        "kind": "Listing",
        "data": {
            "after": null,
            "before": null,
            "children": [{"kind": "t3", "data": {"id": "z9", "title": "Hello", "subreddit": "science"}}]
        }
    })
}

#[tokio::test]
async fn test_listing_goes_through_api_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reddit/r/science.json"))
        .and(query_param("limit", "25"))
        .and(query_param("raw_json", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProxyClient::new(server.uri()).unwrap();
    let listing = client
        .fetch_listing(&ListingTarget::for_category("science"), &ListingQuery::default())
        .await
        .unwrap();

    assert_eq!(listing.posts[0].id, "z9");
    assert!(!listing.is_fallback());
}

#[tokio::test]
async fn test_origin_header_marks_fallback_data() {
    let server = MockServer::start().await;
    let fallback = serde_json::to_value(mock_listing_at("popular", 1_700_000_000)).unwrap();
    Mock::given(method("GET"))
        .and(path("/api/reddit/r/popular.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(ORIGIN_HEADER, "fallback")
                .set_body_json(fallback),
        )
        .mount(&server)
        .await;

    let client = ProxyClient::new(server.uri()).unwrap();
    let listing = client
        .fetch_listing(&ListingTarget::Popular, &ListingQuery::default())
        .await
        .unwrap();

    assert!(listing.is_fallback());
    assert_eq!(listing.modhash.as_deref(), Some("mock_modhash"));
}

#[tokio::test]
async fn test_missing_cors_header_is_cross_origin_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("origin", "https://viewer.example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body()))
        .mount(&server)
        .await;

    let client = ProxyClient::new(server.uri())
        .unwrap()
        .with_origin("https://viewer.example");
    let err = client
        .fetch_listing(&ListingTarget::Popular, &ListingQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), FailureCategory::CrossOrigin);
}

#[tokio::test]
async fn test_not_found_maps_to_not_found_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ProxyClient::new(server.uri()).unwrap();
    let err = client
        .fetch_search("nothing here", &ListingQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.category(), FailureCategory::NotFound);
    assert_eq!(
        err.user_message("search"),
        "search: The requested content was not found."
    );
}
