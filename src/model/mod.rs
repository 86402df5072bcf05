//! Domain model for downloads
//!
//! # Components
//!
//! - `Publication`: a selected catalog entry (title + landing page)
//! - `PublicationStructure`: volumes and their chapters in reading order
//! - `PageKey`: (volume, chapter, page) address of one persisted image

mod page;
mod publication;
mod structure;

pub use page::PageKey;
pub use publication::Publication;
pub use structure::{ChapterRef, PublicationStructure, Volume};
