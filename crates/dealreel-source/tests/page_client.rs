//! Integration tests for `PageClient` against a local `wiremock` server.

use dealreel_core::CategoryConfig;
use dealreel_extract::{collect_categories, ExtractConfig, ExtractionPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealreel_source::{PageClient, SourceError};

const LISTING_PAGE: &str = r#"
<html><body>
  <div class="zg-grid-general-faceout">
    <a href="/Echo-Dot/dp/B09B8V1LZ3/ref=zg_bs_1">
      <img alt="Echo Dot (5th Gen)" src="https://m.media-amazon.com/images/I/echo.jpg">
    </a>
    <span class="p13n-sc-price">$24.99</span>
    <span data-testid="deal-badge-price">50% off</span>
  </div>
  <div class="zg-grid-general-faceout">
    <a href="/Widget/dp/B000000002">
      <img alt="Widget Pro Max" src="https://m.media-amazon.com/images/I/widget.jpg">
    </a>
  </div>
</body></html>
"#;

fn test_client() -> PageClient {
    PageClient::new(5, "dealreel-test/0.1", 0).expect("failed to build test PageClient")
}

fn category(server: &MockServer, name: &str, route: &str) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        url: format!("{}{route}", server.uri()),
        notes: None,
    }
}

#[tokio::test]
async fn fetch_page_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gp/bestsellers/electronics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(&server)
        .await;

    let url = format!("{}/gp/bestsellers/electronics", server.uri());
    let html = test_client().fetch_page(&url).await.unwrap();
    assert!(html.contains("zg-grid-general-faceout"));
}

#[tokio::test]
async fn fetch_category_parses_cards_into_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gp/bestsellers/electronics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_PAGE))
        .mount(&server)
        .await;

    let category = category(&server, "Electronics", "/gp/bestsellers/electronics");
    let batch = test_client().fetch_category(&category).await.unwrap();
    assert_eq!(batch.name, "Electronics");
    assert_eq!(batch.records.len(), 2);

    let snapshot = collect_categories(
        vec![batch],
        ExtractionPolicy::Scrape,
        10,
        "web_scraper",
        &ExtractConfig {
            partner_tag: Some("foo-20".to_string()),
            default_currency: "USD".to_string(),
        },
    )
    .unwrap();

    // The second card has no price or badge and is dropped.
    assert_eq!(snapshot.total_deals, 1);
    let deal = &snapshot.products[0];
    assert_eq!(deal.asin.as_deref(), Some("B09B8V1LZ3"));
    assert_eq!(deal.original_price.as_deref(), Some("$49.98"));
    assert_eq!(deal.category.as_deref(), Some("Electronics"));
    let expected_url = format!("{}/Echo-Dot/dp/B09B8V1LZ3/ref=zg_bs_1?tag=foo-20", server.uri());
    assert_eq!(deal.product_url.as_deref(), Some(expected_url.as_str()));
}

#[tokio::test]
async fn fetch_category_maps_503_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gp/new-releases"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let category = category(&server, "New Releases", "/gp/new-releases");
    let err = test_client().fetch_category(&category).await.unwrap_err();
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 503, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_page_maps_429_with_default_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client().fetch_page(&server.uri()).await.unwrap_err();
    assert!(
        matches!(
            err,
            SourceError::RateLimited {
                retry_after_secs: 60,
                ..
            }
        ),
        "got: {err:?}"
    );
}
