//! Output module for volume documents and run reporting
//!
//! This module handles:
//! - Binding persisted page images into one PDF per volume
//! - Chapter-level progress display
//! - The end-of-run summary

mod assembler;
mod progress;
mod report;

pub use assembler::{document_name, VolumeAssembler};
pub use progress::{ProgressDisplay, RunProgress};
pub use report::{print_report, RunReport, VolumeFailure};
