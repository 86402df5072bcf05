//! Manga-Binder: a serialized publication downloader
//!
//! This crate searches a catalog site for a publication, discovers its
//! volume/chapter structure, fetches every page image with bounded
//! concurrency and binds each volume into a single PDF document.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;
pub mod url;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Manga-Binder operations
#[derive(Debug, Error)]
pub enum BinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog search for {query:?} failed: {source}")]
    Search {
        query: String,
        #[source]
        source: ExtractError,
    },

    #[error("Structure discovery failed for {url}: {source}")]
    Discovery {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error("Could not resolve page count for {url}: {source}")]
    CountResolution {
        url: String,
        #[source]
        source: ExtractError,
    },

    #[error(
        "{failed} of {total} pages failed in volume {volume}, chapter {chapter} (first: page {page}: {source})"
    )]
    PageFetch {
        volume: usize,
        chapter: usize,
        page: u32,
        failed: usize,
        total: u32,
        #[source]
        source: PageError,
    },

    #[error("Assembly of volume {volume} failed: {source}")]
    Assembly {
        volume: usize,
        #[source]
        source: AssemblyError,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot carry a path: {0}")]
    CannotBeABase(String),
}

/// Transport-level failures of a single request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// Returns true if retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout { .. } | Self::Connect { .. } => true,
            Self::Network { .. } => false,
        }
    }
}

/// Failures of the fetch-then-extract capability
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Malformed document at {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("No {what} found at {url}")]
    Missing { url: String, what: &'static str },
}

/// Failure of a single page inside a chapter fan-out
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Page task aborted: {0}")]
    Aborted(String),
}

/// Failures while binding a volume's images into a document
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Missing image for chapter {chapter}, page {page} at {path}")]
    MissingImage {
        chapter: usize,
        page: u32,
        path: PathBuf,
    },

    #[error("Unreadable image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PDF encoding error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Volume {0} has no pages")]
    Empty(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Manga-Binder operations
pub type Result<T> = std::result::Result<T, BinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, PageExtractor, PageSource};
pub use model::{Publication, PublicationStructure};
pub use output::RunReport;
