//! Integration tests for the fetcher's retry behaviour
//!
//! These tests use wiremock to serve scripted status codes and check how
//! many attempts the fetcher makes before it succeeds or gives up.

use docs_mirror::config::FetcherConfig;
use docs_mirror::crawler::{AttemptOutcome, FetchError, Fetcher};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fetcher with a short backoff so retries finish quickly
fn create_test_fetcher(max_attempts: u32, backoff_ms: u64) -> Fetcher {
    let config = FetcherConfig {
        max_attempts,
        backoff_ms,
        timeout_secs: 5,
        connect_timeout_secs: 2,
        user_agents: vec!["TestAgent/1.0".to_string()],
    };
    Fetcher::new(&config).expect("Failed to build fetcher")
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ec2/index.html"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ec2</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5, 10);
    let url = format!("{}/ec2/index.html", mock_server.uri());
    let page = fetcher.fetch(&url).await.expect("Fetch failed");

    assert_eq!(page.status_code, 200);
    assert_eq!(page.url, url);
    assert_eq!(page.body, b"<html>ec2</html>");
}

#[tokio::test]
async fn test_rate_limit_exhausts_after_max_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/throttled"))
        .respond_with(ResponseTemplate::new(403))
        .expect(5)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5, 10);
    let url = format!("{}/throttled", mock_server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last, .. } => {
            assert_eq!(attempts, 5);
            assert_eq!(last, Some(AttemptOutcome::RateLimited));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A long backoff makes any accidental sleep visible
    let fetcher = create_test_fetcher(5, 10_000);
    let url = format!("{}/missing", mock_server.uri());

    let started = Instant::now();
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert!(!err.is_exhausted());
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5, 10);
    let url = format!("{}/broken", mock_server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(5, 10);
    let url = format!("{}/flaky", mock_server.uri());
    let page = fetcher.fetch(&url).await.expect("Fetch failed");

    assert_eq!(page.body, b"finally");
}

#[tokio::test]
async fn test_connection_refused_is_retried() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fetcher = create_test_fetcher(3, 10);
    let url = format!("http://127.0.0.1:{}/page", port);
    let err = fetcher.fetch(&url).await.unwrap_err();

    match err {
        FetchError::RetriesExhausted { attempts, last, .. } => {
            assert_eq!(attempts, 3);
            assert_eq!(last, Some(AttemptOutcome::TemporaryError));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
}
