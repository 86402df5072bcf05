//! Working storage for persisted page images
//!
//! Images live on disk between download and document assembly. The
//! pipeline driver creates the area after discovery and removes it in one
//! sweep once every volume has been bound.

mod workspace;

pub use workspace::{sanitize_title, Workspace};
