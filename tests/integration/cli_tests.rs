use crate::support::mount_search;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &str = env!("CARGO_BIN_EXE_manga-binder");

async fn run_in(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(BINARY)
        .args(args)
        .current_dir(dir.path())
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_missing_query_exit_code() {
    let dir = TempDir::new().unwrap();

    let output = run_in(&dir, &[]).await;

    // -1 as seen by the parent process
    assert_eq!(output.status.code(), Some(255));
    assert!(!dir.path().join("Data").exists());
}

/// Writes a config file pointing at `server`, without retries
fn write_config(dir: &TempDir, server: &MockServer) -> std::path::PathBuf {
    let config_path = dir.path().join("binder.toml");
    std::fs::write(
        &config_path,
        format!(
            "[catalog]\nbase-url = \"{}\"\n\n[http]\nretry-attempts = 0\n",
            server.uri()
        ),
    )
    .unwrap();
    config_path
}

#[tokio::test]
async fn test_no_search_results_exit_code() {
    let server = MockServer::start().await;
    mount_search(&server, "Nothing", &[]).await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server);

    let output = run_in(&dir, &["--config", config_path.to_str().unwrap(), "Nothing"]).await;

    // -2 as seen by the parent process
    assert_eq!(output.status.code(), Some(254));
    assert!(!dir.path().join("Data").exists());
}

#[tokio::test]
async fn test_invalid_concurrency_override() {
    let dir = TempDir::new().unwrap();

    let output = run_in(&dir, &["--concurrency", "0", "Example"]).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("concurrent"));
}

#[tokio::test]
async fn test_failed_run_reports_error_once() {
    let server = MockServer::start().await;
    mount_search(&server, "Example", &[("Example Title", "/manga/1/example-title")]).await;
    Mock::given(method("GET"))
        .and(path("/manga/1/example-title"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, &server);

    let output = run_in(
        &dir,
        &["--config", config_path.to_str().unwrap(), "-y", "Example"],
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Structure discovery failed").count(), 1);
    assert!(!dir.path().join("Data").exists());
}
