use std::fmt;
use url::Url;

/// A catalog entry chosen for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Display title as listed by the catalog
    pub title: String,

    /// Canonical landing page
    pub url: Url,
}

impl Publication {
    pub fn new(title: impl Into<String>, url: Url) -> Self {
        Self {
            title: title.into(),
            url,
        }
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
