//! Integration tests for `HttpDetailFetcher`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use jobalert_scraper::{DescriptionSource, HttpDetailFetcher, ScraperError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 5-second timeout, descriptive UA, no retries.
fn test_fetcher() -> HttpDetailFetcher {
    HttpDetailFetcher::new(5, "jobalert-test/0.1", 0, 0).expect("failed to build test fetcher")
}

fn test_fetcher_with_retries(max_retries: u32) -> HttpDetailFetcher {
    HttpDetailFetcher::new(5, "jobalert-test/0.1", max_retries, 0)
        .expect("failed to build test fetcher")
}

const POSTING_HTML: &str = "<html><head><script>track('python')</script></head>\
    <body><h1>Data Analyst</h1><section>Strong SQL and Excel skills.</section></body></html>";

#[tokio::test]
async fn fetch_description_normalizes_successful_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POSTING_HTML))
        .mount(&server)
        .await;

    let url = format!("{}/jobs/view/1", server.uri());
    let description = test_fetcher().fetch_description(&url).await;

    assert_eq!(description, "data analyst strong sql and excel skills.");
}

#[tokio::test]
async fn fetch_markup_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/404"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/jobs/view/404", server.uri());
    let err = test_fetcher_with_retries(3)
        .fetch_markup(&url)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::NotFound { url: ref u } if *u == url));
}

#[tokio::test]
async fn fetch_markup_maps_429_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/2"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let url = format!("{}/jobs/view/2", server.uri());
    let err = test_fetcher().fetch_markup(&url).await.unwrap_err();

    assert!(matches!(
        err,
        ScraperError::RateLimited {
            retry_after_secs: 7,
            ..
        }
    ));
}

#[tokio::test]
async fn fetch_markup_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/3"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Tableau</p>"))
        .mount(&server)
        .await;

    let url = format!("{}/jobs/view/3", server.uri());
    let markup = test_fetcher_with_retries(2).fetch_markup(&url).await.unwrap();

    assert_eq!(markup, "<p>Tableau</p>");
}

#[tokio::test]
async fn fetch_description_degrades_to_empty_on_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/view/4"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let url = format!("{}/jobs/view/4", server.uri());
    assert_eq!(test_fetcher().fetch_description(&url).await, "");
}

#[tokio::test]
async fn fetch_description_degrades_to_empty_on_connection_failure() {
    // Nothing listens on port 9 of localhost.
    let description = test_fetcher()
        .fetch_description("http://127.0.0.1:9/jobs/view/5")
        .await;
    assert_eq!(description, "");
}
