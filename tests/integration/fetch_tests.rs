use manga_binder::config::HttpConfig;
use manga_binder::crawler::{HttpSource, PageSource};
use manga_binder::FetchError;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source() -> HttpSource {
    let config = HttpConfig {
        retry_attempts: 2,
        retry_delay_ms: 5,
        ..HttpConfig::default()
    };
    HttpSource::from_config(&config).unwrap()
}

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn test_server_error_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let body = source().fetch_text(&url(&server, "/page")).await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = source()
        .fetch_bytes(&url(&server, "/missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = source().fetch_text(&url(&server, "/down")).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
    assert!(err.is_transient());
}
