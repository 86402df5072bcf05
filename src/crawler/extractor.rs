//! Fetch-then-extract wrapper around a `PageSource`

use crate::crawler::parser::{parse_nodes, CatalogNode, NodeKind};
use crate::crawler::PageSource;
use crate::ExtractError;
use std::sync::Arc;
use url::Url;

/// Returns structured nodes for a URL
///
/// Cheap to clone; clones share the underlying source.
#[derive(Clone)]
pub struct PageExtractor {
    source: Arc<dyn PageSource>,
}

impl PageExtractor {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    /// Fetches `url` and extracts nodes of the requested kinds
    ///
    /// The parsed document never lives across an await point, so the
    /// returned future stays `Send`.
    pub async fn extract(
        &self,
        url: &Url,
        kinds: &[NodeKind],
    ) -> Result<Vec<CatalogNode>, ExtractError> {
        let body = self.source.fetch_text(url).await?;
        tracing::trace!("Fetched {} ({} bytes)", url, body.len());

        parse_nodes(&body, url, kinds).map_err(|message| ExtractError::Malformed {
            url: url.to_string(),
            message,
        })
    }

    /// Fetches a binary resource unchanged
    pub async fn fetch_binary(&self, url: &Url) -> Result<Vec<u8>, ExtractError> {
        Ok(self.source.fetch_bytes(url).await?)
    }
}

impl std::fmt::Debug for PageExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageExtractor").finish_non_exhaustive()
    }
}
