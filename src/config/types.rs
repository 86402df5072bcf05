use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Manga-Binder
///
/// Every section is optional in the TOML file; missing keys fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub http: HttpConfig,
    pub download: DownloadConfig,
}

/// Catalog site layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Root of the catalog site
    pub base_url: String,

    /// Path of the search endpoint, relative to `base_url`
    pub search_path: String,

    /// Value of the `style` query parameter on page viewer URLs
    pub page_style: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.mangaworld.so".to_string(),
            search_path: "/archive".to_string(),
            page_style: "pages".to_string(),
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Total request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Additional attempts after a transient failure
    pub retry_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("manga-binder/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            retry_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Download and output layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Maximum number of page fetches in flight within one chapter
    pub max_concurrent_pages: usize,

    /// Root of the working storage area for persisted page images
    pub work_dir: PathBuf,

    /// Directory receiving one PDF per volume
    pub output_dir: PathBuf,

    /// Keep the working storage area after a successful run
    pub keep_work_dir: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: 8,
            work_dir: PathBuf::from("Data"),
            output_dir: PathBuf::from("."),
            keep_work_dir: false,
        }
    }
}
