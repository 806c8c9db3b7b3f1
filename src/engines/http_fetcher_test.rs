// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::HttpPageFetcher;
use crate::engines::traits::{EngineError, PageFetcher};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_body_and_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pleno/congresistas/"))
        .and(header("user-agent", "congreso-test/1.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><table></table></body></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new("congreso-test/1.0", Duration::from_secs(5)).unwrap();
    let body = fetcher
        .fetch(&format!("{}/pleno/congresistas/", server.uri()))
        .await
        .unwrap();

    assert!(body.contains("<table>"));
    assert_eq!(fetcher.name(), "http");
}

#[tokio::test]
async fn test_fetch_rejects_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new("congreso-test/1.0", Duration::from_secs(5)).unwrap();
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();

    assert!(matches!(err, EngineError::UnexpectedStatus(503)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_not_found_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpPageFetcher::new("congreso-test/1.0", Duration::from_secs(5)).unwrap();
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();

    assert!(matches!(err, EngineError::UnexpectedStatus(404)));
    assert!(!err.is_retryable());
}
