//! Discovered volume/chapter layout of a publication
use url::Url;

/// A chapter within a volume, in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    /// Zero-based position within its volume
    pub index: usize,

    /// Canonical chapter location (no query, no trailing slash)
    pub location: Url,
}

/// A reading-order group of chapters, explicit or implicit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// Zero-based position within the publication
    pub index: usize,

    /// Chapters in reading order
    pub chapters: Vec<ChapterRef>,
}

impl Volume {
    /// Returns the number of chapters in this volume
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Returns true if the volume has no chapters
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// Ordered mapping volume index -> ordered chapter locations
///
/// Volume and chapter indices are contiguous and zero-based; index `i`
/// always sits at position `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationStructure {
    volumes: Vec<Volume>,
}

impl PublicationStructure {
    /// Builds a structure from chapter lists already in reading order
    ///
    /// Empty lists are dropped so that no volume without chapters is ever
    /// downloaded or bound.
    pub fn from_reading_order(volumes: Vec<Vec<Url>>) -> Self {
        let volumes = volumes
            .into_iter()
            .filter(|chapters| !chapters.is_empty())
            .enumerate()
            .map(|(index, chapters)| Volume {
                index,
                chapters: chapters
                    .into_iter()
                    .enumerate()
                    .map(|(index, location)| ChapterRef { index, location })
                    .collect(),
            })
            .collect();

        Self { volumes }
    }

    /// Returns the volumes in reading order
    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    /// Returns the volume at `index`, if any
    pub fn volume(&self, index: usize) -> Option<&Volume> {
        self.volumes.get(index)
    }

    /// Returns the number of volumes
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    /// Returns the number of chapters across all volumes
    pub fn total_chapters(&self) -> usize {
        self.volumes.iter().map(Volume::len).sum()
    }

    /// Returns true if there is nothing to download
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}
