//! Page-count resolution for a chapter

use crate::crawler::parser::{CatalogNode, NodeKind};
use crate::crawler::PageExtractor;
use crate::url::page_url;
use crate::{BinderError, ExtractError};
use url::Url;

/// Largest page count accepted from a chapter's page selector
pub const MAX_PAGES_PER_CHAPTER: u32 = 2000;

/// Resolves how many pages a chapter has
#[derive(Debug, Clone)]
pub struct ChapterImageCounter {
    extractor: PageExtractor,
    page_style: String,
}

impl ChapterImageCounter {
    pub fn new(extractor: PageExtractor, page_style: impl Into<String>) -> Self {
        Self {
            extractor,
            page_style: page_style.into(),
        }
    }

    /// Reads the page selector of the chapter's first page
    ///
    /// The selector's first option reads `1/N`; N is the page count. A
    /// missing selector, an unparseable label, a zero count or a count above
    /// `MAX_PAGES_PER_CHAPTER` is a `BinderError::CountResolution`.
    pub async fn page_count(&self, chapter: &Url) -> Result<u32, BinderError> {
        let fail = |source: ExtractError| BinderError::CountResolution {
            url: chapter.to_string(),
            source,
        };

        let first_page = page_url(chapter, 1, &self.page_style)?;
        let nodes = self
            .extractor
            .extract(&first_page, &[NodeKind::PageSelector])
            .await
            .map_err(fail)?;

        let (label, total) = nodes
            .into_iter()
            .find_map(|node| match node {
                CatalogNode::PageSelector { label, total } => Some((label, total)),
                _ => None,
            })
            .ok_or_else(|| {
                fail(ExtractError::Missing {
                    url: first_page.to_string(),
                    what: "page selector",
                })
            })?;

        match total {
            Some(count) if (1..=MAX_PAGES_PER_CHAPTER).contains(&count) => {
                tracing::debug!("Chapter {} has {} pages", chapter, count);
                Ok(count)
            }
            _ => Err(fail(ExtractError::Malformed {
                url: first_page.to_string(),
                message: format!("unusable page count label '{}'", label),
            })),
        }
    }
}
