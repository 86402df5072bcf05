use std::fmt;

/// Address of one page image within a publication
///
/// `page` is 1-based; volume and chapter indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub volume: usize,
    pub chapter: usize,
    pub page: u32,
}

impl PageKey {
    pub fn new(volume: usize, chapter: usize, page: u32) -> Self {
        Self {
            volume,
            chapter,
            page,
        }
    }

    /// File name of the persisted image within its volume directory
    pub fn file_name(&self) -> String {
        format!("{}_{}.jpg", self.chapter, self.page)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "volume {} chapter {} page {}",
            self.volume, self.chapter, self.page
        )
    }
}
