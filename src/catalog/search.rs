use crate::config::CatalogConfig;
use crate::crawler::{CatalogNode, NodeKind, PageExtractor};
use crate::model::Publication;
use crate::url::search_url;
use crate::BinderError;
use std::collections::HashSet;

/// Catalog search over the site's archive page
#[derive(Debug, Clone)]
pub struct Catalog {
    extractor: PageExtractor,
    config: CatalogConfig,
}

impl Catalog {
    pub fn new(extractor: PageExtractor, config: CatalogConfig) -> Self {
        Self { extractor, config }
    }

    /// Searches the catalog for `query`
    ///
    /// Hits keep the catalog's order; a title listed twice keeps its first
    /// occurrence. An empty list is a valid "not found" outcome.
    pub async fn search(&self, query: &str) -> Result<Vec<Publication>, BinderError> {
        let url = search_url(&self.config.base_url, &self.config.search_path, query)?;
        tracing::info!("Searching catalog: {}", url);

        let nodes = self
            .extractor
            .extract(&url, &[NodeKind::SearchHit])
            .await
            .map_err(|source| BinderError::Search {
                query: query.to_string(),
                source,
            })?;

        let mut seen = HashSet::new();
        let hits: Vec<Publication> = nodes
            .into_iter()
            .filter_map(|node| match node {
                CatalogNode::SearchHit { title, url } => Some(Publication::new(title, url)),
                _ => None,
            })
            .filter(|publication| seen.insert(publication.title.clone()))
            .collect();

        tracing::info!("{} results for {:?}", hits.len(), query);
        Ok(hits)
    }
}
