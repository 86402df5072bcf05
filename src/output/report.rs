//! Summary of a completed download run

use std::path::PathBuf;

/// A volume whose document could not be produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeFailure {
    pub volume: usize,
    pub reason: String,
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Publication title
    pub title: String,

    /// Documents written, in volume order
    pub documents: Vec<PathBuf>,

    /// Volumes whose assembly failed
    pub failed_volumes: Vec<VolumeFailure>,

    /// Chapters fetched
    pub chapters: usize,

    /// Page images fetched
    pub pages: u64,

    /// Whether a working storage area was created and later removed
    pub work_dir_removed: bool,
}

impl RunReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// True when every volume produced its document
    pub fn is_success(&self) -> bool {
        self.failed_volumes.is_empty()
    }

    /// True when the publication had nothing to download
    pub fn is_empty(&self) -> bool {
        self.chapters == 0 && self.documents.is_empty() && self.failed_volumes.is_empty()
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== {} ===\n", report.title);

    if report.is_empty() {
        println!("Nothing to download: the publication lists no chapters.");
        return;
    }

    println!("Overview:");
    println!("  Chapters fetched: {}", report.chapters);
    println!("  Pages fetched: {}", report.pages);
    println!();

    println!("Documents ({}):", report.documents.len());
    for path in &report.documents {
        println!("  - {}", path.display());
    }

    if !report.failed_volumes.is_empty() {
        println!();
        println!("Failed Volumes ({}):", report.failed_volumes.len());
        for failure in &report.failed_volumes {
            println!("  - Volume {}: {}", failure.volume, failure.reason);
        }
    }

    if !report.work_dir_removed {
        println!();
        println!("Working storage was kept for inspection.");
    }
}
