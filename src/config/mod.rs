//! Configuration module for Manga-Binder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; a missing file means the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use manga_binder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("binder.toml")).unwrap();
//! println!("Catalog: {}", config.catalog.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CatalogConfig, Config, DownloadConfig, HttpConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::{validate, MAX_CONCURRENT_PAGES, MAX_RETRY_ATTEMPTS};
