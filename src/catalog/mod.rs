//! Catalog search and publication selection
//!
//! A thin layer in front of the download pipeline: turn a free-text query
//! into candidate publications and let the user pick one.

mod prompt;
mod search;

pub use prompt::choose;
pub use search::Catalog;
