//! Volume/chapter discovery from a publication landing page

use crate::crawler::parser::{CatalogNode, NodeKind};
use crate::crawler::PageExtractor;
use crate::model::PublicationStructure;
use crate::BinderError;
use url::Url;

/// Discovers the reading-order structure of a publication
#[derive(Debug, Clone)]
pub struct StructureCrawler {
    extractor: PageExtractor,
}

impl StructureCrawler {
    pub fn new(extractor: PageExtractor) -> Self {
        Self { extractor }
    }

    /// Fetches the landing page and maps volumes to chapter locations
    ///
    /// Any fetch or parse failure is a `BinderError::Discovery`. A landing
    /// page with neither volumes nor chapters yields an empty structure.
    pub async fn discover(&self, publication_url: &Url) -> Result<PublicationStructure, BinderError> {
        let nodes = self
            .extractor
            .extract(
                publication_url,
                &[NodeKind::VolumeGroup, NodeKind::ChapterGroup],
            )
            .await
            .map_err(|source| BinderError::Discovery {
                url: publication_url.to_string(),
                source,
            })?;

        let structure = structure_from_nodes(nodes);
        tracing::info!(
            "Discovered {} volumes, {} chapters at {}",
            structure.volume_count(),
            structure.total_chapters(),
            publication_url
        );

        Ok(structure)
    }
}

/// Turns catalog-order nodes into a reading-order structure
///
/// The catalog lists volumes and chapters newest first:
/// - with volume groups, the group list is reversed once and every group's
///   chapter list is reversed
/// - without them, all loose chapter links form one implicit volume 0,
///   reversed as a whole
pub fn structure_from_nodes(nodes: Vec<CatalogNode>) -> PublicationStructure {
    let mut volumes = Vec::new();
    let mut loose = Vec::new();

    for node in nodes {
        match node {
            CatalogNode::VolumeGroup { chapters } => volumes.push(chapters),
            CatalogNode::ChapterGroup { chapters } => loose.extend(chapters),
            _ => {}
        }
    }

    if volumes.is_empty() {
        loose.reverse();
        return PublicationStructure::from_reading_order(vec![loose]);
    }

    volumes.reverse();
    for chapters in &mut volumes {
        chapters.reverse();
    }
    PublicationStructure::from_reading_order(volumes)
}
