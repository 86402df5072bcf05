//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core download logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing into typed catalog nodes
//! - Structure discovery and page counting
//! - Bounded concurrent image fetching
//! - Overall pipeline coordination

mod coordinator;
mod counter;
mod extractor;
mod fetcher;
mod images;
mod parser;
mod structure;

pub use coordinator::{run_download, Coordinator, FetchedVolume};
pub use counter::{ChapterImageCounter, MAX_PAGES_PER_CHAPTER};
pub use extractor::PageExtractor;
pub use fetcher::{build_http_client, HttpSource, PageSource, RetryPolicy};
pub use images::{ChapterFetch, ImageFetcher};
pub use parser::{parse_nodes, parse_page_total, CatalogNode, NodeKind};
pub use structure::{structure_from_nodes, StructureCrawler};
