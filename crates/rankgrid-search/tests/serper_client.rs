//! Integration tests for `SerperClient` using wiremock HTTP mocks.

use rankgrid_search::{
    track_ranking, Coordinates, RankQuery, RankedSearch, SearchError, SearchMode, SearchRequest,
    SerperClient, TrackerSettings,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SerperClient {
    SerperClient::with_base_url(Some("test-key"), 30, "rankgrid-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn request(mode: SearchMode, page: u32) -> SearchRequest {
    SearchRequest {
        keyword: "coffee shop".to_owned(),
        mode,
        country: "us".to_owned(),
        language: "en".to_owned(),
        location: Some(Coordinates {
            latitude: 30.25,
            longitude: -97.75,
        }),
        zoom: 14,
        page,
    }
}

#[tokio::test]
async fn organic_page_is_parsed_with_page_positions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("X-API-KEY", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "q": "coffee shop",
            "gl": "us",
            "hl": "en",
            "page": 2,
            "num": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "searchParameters": { "q": "coffee shop" },
            "organic": [
                { "title": "Best Coffee", "link": "https://bestcoffee.com/", "position": 11 },
                { "title": "Bean There", "link": "https://beanthere.io/menu", "position": 12 }
            ]
        })))
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .fetch_page(&request(SearchMode::Organic, 2))
        .await
        .expect("should parse organic page");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].position, 1);
    assert_eq!(page.items[1].position, 2);
    assert_eq!(page.items[1].link.as_deref(), Some("https://beanthere.io/menu"));
}

#[tokio::test]
async fn places_page_sends_location_and_maps_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places"))
        .and(body_partial_json(serde_json::json!({
            "q": "coffee shop",
            "page": 1,
            "ll": "@30.25,-97.75,14z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "places": [
                {
                    "title": "Joe's Coffee",
                    "address": "1 Main St",
                    "website": "https://joescoffee.com",
                    "rating": 4.6,
                    "ratingCount": 210,
                    "phoneNumber": "(512) 555-0100"
                },
                { "title": "No Website Diner", "website": "" }
            ]
        })))
        .mount(&server)
        .await;

    let page = test_client(&server.uri())
        .fetch_page(&request(SearchMode::Local, 1))
        .await
        .expect("should parse places page");

    assert_eq!(page.items.len(), 2);
    let first = &page.items[0];
    assert_eq!(first.title, "Joe's Coffee");
    assert_eq!(first.address.as_deref(), Some("1 Main St"));
    assert_eq!(first.rating, Some(4.6));
    assert_eq!(first.review_count, Some(210));
    assert_eq!(first.phone_number.as_deref(), Some("(512) 555-0100"));
    assert!(page.items[1].link.is_none());
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_page(&request(SearchMode::Organic, 1))
        .await
        .expect_err("500 should be an error");

    match err {
        SearchError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_result_array_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/places"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "searchParameters": { "q": "coffee shop" }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_page(&request(SearchMode::Local, 1))
        .await
        .expect_err("payload without places should fail");

    assert!(matches!(err, SearchError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn missing_api_key_fails_without_calling_provider() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = SerperClient::with_base_url(None, 30, "rankgrid-test/0.1", &server.uri())
        .expect("client construction should not fail");

    assert!(!client.is_configured());
    assert!(matches!(
        client.ensure_configured(),
        Err(SearchError::MissingApiKey)
    ));
    let err = client
        .fetch_page(&request(SearchMode::Organic, 1))
        .await
        .expect_err("fetch without key should fail");
    assert!(matches!(err, SearchError::MissingApiKey));
}

#[tokio::test]
async fn tracker_walks_provider_pages_until_match() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(serde_json::json!({ "page": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic": [
                { "title": "A", "link": "https://a.com/" },
                { "title": "B", "link": "https://b.com/" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(serde_json::json!({ "page": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "organic": [
                { "title": "C", "link": "https://c.com/" },
                { "title": "Target", "link": "https://shop.example.com/about" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = RankQuery {
        keyword: "coffee shop".to_owned(),
        target_domain: "example.com".to_owned(),
        mode: SearchMode::Organic,
        country: "us".to_owned(),
        language: "en".to_owned(),
        location: None,
        zoom: 14,
    };
    let result = track_ranking(
        &test_client(&server.uri()),
        &query,
        TrackerSettings::default(),
    )
    .await;

    assert!(result.found);
    assert_eq!(result.rank, Some(4));
    assert_eq!(result.page, Some(2));
    assert_eq!(result.position_on_page, Some(2));
    assert_eq!(result.pages_fetched, 2);
    assert!(result.error.is_none());
}
