//! Integration tests for `GoogleSearchClient` using wiremock HTTP mocks.

use goodnews_collector::{CollectorError, GoogleSearchClient, SearchProvider, SearchRequest};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GoogleSearchClient {
    GoogleSearchClient::with_base_url("test-key", "cx-1", 30, "goodnews-test", base_url)
        .expect("client construction should not fail")
}

fn request(keyword: &str, page: u32) -> SearchRequest {
    SearchRequest {
        keyword: keyword.to_string(),
        page,
        page_size: 10,
    }
}

#[tokio::test]
async fn search_returns_mapped_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "kind": "customsearch#search",
        "items": [
            {
                "title": "保護犬の譲渡会が盛況",
                "link": "https://news.example.jp/articles/1",
                "snippet": "週末の譲渡会で30頭に新しい家族が見つかった。",
                "displayLink": "news.example.jp",
                "pagemap": {
                    "metatags": [{
                        "article:published_time": "2024-05-01T09:00:00+09:00",
                        "og:site_name": "Example News"
                    }]
                }
            },
            {
                "title": "No metadata",
                "link": "https://blog.example.com/post",
                "snippet": "plain",
                "displayLink": "blog.example.com"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "test-key"))
        .and(query_param("cx", "cx-1"))
        .and(query_param("q", "ペット"))
        .and(query_param("start", "1"))
        .and(query_param("sort", "date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let results = test_client(&server.uri())
        .search(&request("ペット", 1))
        .await
        .expect("search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].link, "https://news.example.jp/articles/1");
    assert_eq!(
        results[0].published_raw.as_deref(),
        Some("2024-05-01T09:00:00+09:00")
    );
    assert_eq!(results[0].publisher.as_deref(), Some("Example News"));
    assert!(results[1].published_raw.is_none());
    assert_eq!(results[1].publisher.as_deref(), Some("blog.example.com"));
}

#[tokio::test]
async fn missing_items_is_an_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("start", "21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "customsearch#search",
            "searchInformation": { "totalResults": "0" }
        })))
        .mount(&server)
        .await;

    let results = test_client(&server.uri())
        .search(&request("ペット", 3))
        .await
        .expect("no results is not an error");
    assert!(results.is_empty());
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited_and_ends_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&request("pets", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CollectorError::RateLimited { .. }));
    assert!(err.ends_run());
}

#[tokio::test]
async fn server_error_is_unexpected_status_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&request("pets", 1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CollectorError::UnexpectedStatus { status: 503, .. }
    ));
    assert!(!err.ends_run());
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn forbidden_ends_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&request("pets", 1))
        .await
        .unwrap_err();
    assert!(err.ends_run());
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(&request("pets", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, CollectorError::Deserialize { .. }));
}
