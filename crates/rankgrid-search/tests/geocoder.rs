//! Integration tests for `Geocoder` using wiremock HTTP mocks.

use rankgrid_search::{GeocodeCache, GeocodeError, Geocoder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_geocoder(base_url: &str) -> Geocoder {
    Geocoder::with_base_url(30, "rankgrid-test/0.1", base_url, GeocodeCache::new(8))
        .expect("geocoder construction should not fail")
}

#[tokio::test]
async fn parses_string_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Austin, TX"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "place_id": 1,
                "display_name": "Austin, Travis County, Texas, United States",
                "lat": "30.2711286",
                "lon": "-97.7436995"
            }
        ])))
        .mount(&server)
        .await;

    let results = test_geocoder(&server.uri())
        .geocode("Austin, TX")
        .await
        .expect("should geocode");

    assert_eq!(results.len(), 1);
    assert!((results[0].latitude - 30.271_128_6).abs() < 1e-9);
    assert!((results[0].longitude + 97.743_699_5).abs() < 1e-9);
    assert!(results[0].display_name.starts_with("Austin"));
}

#[tokio::test]
async fn repeated_queries_are_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "display_name": "Austin", "lat": "30.27", "lon": "-97.74" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server.uri());
    let first = geocoder.geocode("Austin TX").await.expect("first lookup");
    let second = geocoder.geocode("  austin   tx ").await.expect("cached lookup");

    assert_eq!(first, second);
    assert_eq!(geocoder.cache().len(), 1);
}

#[tokio::test]
async fn blank_query_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri())
        .geocode("   ")
        .await
        .expect_err("blank query should fail");
    assert!(matches!(err, GeocodeError::BlankQuery));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server.uri());
    let err = geocoder
        .geocode("Austin")
        .await
        .expect_err("503 should fail");
    assert!(matches!(err, GeocodeError::UnexpectedStatus { status: 503 }));
    assert!(geocoder.cache().is_empty());
}

#[tokio::test]
async fn non_numeric_coordinate_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "display_name": "Nowhere", "lat": "north", "lon": "-97.74" }
        ])))
        .mount(&server)
        .await;

    let err = test_geocoder(&server.uri())
        .geocode("Nowhere")
        .await
        .expect_err("bad coordinate should fail");
    assert!(matches!(err, GeocodeError::InvalidCoordinate(ref s) if s == "north"));
}
