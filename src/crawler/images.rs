//! Concurrent page-image retrieval for one chapter
//!
//! This module handles:
//! - Resolving a page viewer to its embedded image
//! - Downloading and persisting the image at its canonical path
//! - Fan-out of every page of a chapter with a concurrency cap, and the
//!   join that waits for all of them

use crate::crawler::parser::{CatalogNode, NodeKind};
use crate::crawler::PageExtractor;
use crate::model::PageKey;
use crate::storage::Workspace;
use crate::url::page_url;
use crate::{BinderError, ExtractError, PageError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Outcome of a fully persisted chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFetch {
    /// Number of pages persisted
    pub pages: u32,

    /// Persisted files, in page order
    pub files: Vec<PathBuf>,
}

/// Fetches and persists every page image of a chapter
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    extractor: PageExtractor,
    workspace: Workspace,
    page_style: String,
    max_concurrent: usize,
}

impl ImageFetcher {
    /// Creates a fetcher writing into `workspace`
    ///
    /// `max_concurrent` caps the number of pages in flight; it is clamped
    /// to at least 1.
    pub fn new(
        extractor: PageExtractor,
        workspace: Workspace,
        page_style: impl Into<String>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            extractor,
            workspace,
            page_style: page_style.into(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetches pages `1..=page_count` of a chapter
    ///
    /// Every page is dispatched, and this only returns once every dispatched
    /// page has finished, whether it succeeded or failed. Any failed page
    /// makes the whole chapter a `BinderError::PageFetch` reporting the
    /// lowest failed page number; pages that did succeed stay persisted.
    pub async fn fetch_chapter(
        &self,
        chapter: &Url,
        volume: usize,
        chapter_index: usize,
        page_count: u32,
    ) -> Result<ChapterFetch, BinderError> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for page in 1..=page_count {
            let key = PageKey::new(volume, chapter_index, page);
            let page_location = page_url(chapter, page, &self.page_style)?;
            let fetcher = self.clone();
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let result = fetcher.fetch_page(&page_location, key).await;
                (page, result)
            });
        }

        let mut files = Vec::with_capacity(page_count as usize);
        let mut failures: Vec<(u32, PageError)> = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page, Ok(path))) => files.push((page, path)),
                Ok((page, Err(e))) => {
                    tracing::warn!("Page {} of {} failed: {}", page, chapter, e);
                    failures.push((page, e));
                }
                Err(e) => failures.push((0, PageError::Aborted(e.to_string()))),
            }
        }

        if !failures.is_empty() {
            failures.sort_by_key(|(page, _)| *page);
            let failed = failures.len();
            let (page, source) = failures.swap_remove(0);
            return Err(BinderError::PageFetch {
                volume,
                chapter: chapter_index,
                page,
                failed,
                total: page_count,
                source,
            });
        }

        files.sort_by_key(|(page, _)| *page);
        Ok(ChapterFetch {
            pages: page_count,
            files: files.into_iter().map(|(_, path)| path).collect(),
        })
    }

    /// Fetches a single page: viewer, then image, then disk
    ///
    /// A failed image download never leaves a file behind.
    pub async fn fetch_page(&self, page_location: &Url, key: PageKey) -> Result<PathBuf, PageError> {
        let nodes = self
            .extractor
            .extract(page_location, &[NodeKind::Image])
            .await?;

        let src = nodes
            .into_iter()
            .find_map(|node| match node {
                CatalogNode::Image { src } => Some(src),
                _ => None,
            })
            .ok_or_else(|| ExtractError::Missing {
                url: page_location.to_string(),
                what: "page image",
            })?;

        let bytes = self.extractor.fetch_binary(&src).await?;
        if bytes.is_empty() {
            return Err(ExtractError::Malformed {
                url: src.to_string(),
                message: "empty image body".to_string(),
            }
            .into());
        }

        let path = self
            .workspace
            .persist(key, &bytes)
            .await
            .map_err(|source| PageError::Persist {
                path: self.workspace.image_path(key),
                source,
            })?;

        tracing::debug!("Persisted {} ({} bytes)", key, bytes.len());
        Ok(path)
    }
}
