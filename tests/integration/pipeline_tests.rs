use crate::support::{mount_chapter, mount_landing, mount_search, page_widths, test_config};
use manga_binder::catalog::Catalog;
use manga_binder::crawler::Coordinator;
use manga_binder::BinderError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_search_then_download_over_http() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_search(&server, "Example", &[("Example Title", "/manga/1/example-title")]).await;
    mount_landing(&server, "/manga/1/example-title", &["/read/chap-b", "/read/chap-a"]).await;
    mount_chapter(&server, "/read/chap-a", &[31, 32, 33]).await;
    mount_chapter(&server, "/read/chap-b", &[41, 42]).await;

    let coordinator = Coordinator::new(config.clone()).unwrap();
    let catalog = Catalog::new(coordinator.extractor().clone(), config.catalog.clone());

    let hits = catalog.search("Example").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Example Title");

    let report = coordinator.run(&hits[0]).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.pages, 5);
    let document = dir.path().join("out").join("Volume_0.pdf");
    assert_eq!(report.documents, vec![document.clone()]);
    assert_eq!(page_widths(&document), vec![31, 32, 33, 41, 42]);
    assert!(!dir.path().join("Data").exists());
}

#[tokio::test]
async fn test_search_without_results_over_http() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());
    mount_search(&server, "Nothing", &[]).await;

    let coordinator = Coordinator::new(config.clone()).unwrap();
    let catalog = Catalog::new(coordinator.extractor().clone(), config.catalog);

    assert!(catalog.search("Nothing").await.unwrap().is_empty());
    assert!(!dir.path().join("Data").exists());
}

#[tokio::test]
async fn test_transient_image_failure_is_retried() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    // Mounted first, so it answers before the good image until used up
    Mock::given(method("GET"))
        .and(path("/images/read/flaky/1.jpg"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_landing(&server, "/manga/9", &["/read/flaky"]).await;
    mount_chapter(&server, "/read/flaky", &[50]).await;

    let coordinator = Coordinator::new(config).unwrap();
    let publication = manga_binder::Publication::new(
        "Flaky",
        url::Url::parse(&format!("{}/manga/9", server.uri())).unwrap(),
    );

    let report = coordinator.run(&publication).await.unwrap();
    assert_eq!(report.pages, 1);
    assert_eq!(page_widths(&report.documents[0]), vec![50]);
}

#[tokio::test]
async fn test_missing_page_aborts_without_document() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, dir.path());

    mount_landing(&server, "/manga/10", &["/read/gap"]).await;
    // Claims three pages, serves only the first two viewers
    mount_chapter(&server, "/read/gap", &[10, 10]).await;
    Mock::given(method("GET"))
        .and(path("/read/gap/1"))
        .and(query_param("style", "pages"))
        .respond_with(crate::support::html(
            r#"<select class="page custom-select"><option>1/3</option></select>
            <div class="col-12 text-center position-relative"><img class="img-fluid" src="/images/read/gap/1.jpg"></div>"#
                .to_string(),
        ))
        .with_priority(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(config).unwrap();
    let publication = manga_binder::Publication::new(
        "Gap",
        url::Url::parse(&format!("{}/manga/10", server.uri())).unwrap(),
    );

    let err = coordinator.run(&publication).await.unwrap_err();
    assert!(matches!(
        err,
        BinderError::PageFetch {
            page: 3,
            failed: 1,
            total: 3,
            ..
        }
    ));
    assert!(!dir.path().join("out").join("Volume_0.pdf").exists());
    assert!(dir.path().join("Data").join("Gap").join("0").join("0_1.jpg").is_file());
}
