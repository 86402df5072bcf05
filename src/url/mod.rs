//! URL handling module for Manga-Binder
//!
//! Every address the pipeline touches is derived here: the catalog search
//! URL, canonical chapter locations and per-page viewer URLs.

mod normalize;

pub use normalize::{chapter_location, page_url, resolve_link, search_url};
