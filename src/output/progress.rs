//! Chapter-level progress reporting

use indicatif::{ProgressBar, ProgressStyle};

/// Chapters completed out of the publication total
///
/// Owned by the pipeline driver and threaded through it by value; page
/// tasks never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProgress {
    completed: usize,
    total: usize,
}

impl RunProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Returns the progress after one more chapter finished
    pub fn advance(self) -> Self {
        Self {
            completed: (self.completed + 1).min(self.total),
            ..self
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    /// Completion percentage; an empty run counts as complete
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Terminal rendering of `RunProgress`
#[derive(Debug, Clone)]
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// A visible bar: `Chapter download: [#####     ] 3/10 (30%)`
    pub fn terminal() -> Self {
        let style = ProgressStyle::with_template(
            "{prefix} [{bar:50}] {pos}/{len} chapters ({percent}%)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("## ");

        let bar = ProgressBar::new(0);
        bar.set_style(style);
        bar.set_prefix("Chapter download:");
        Self { bar }
    }

    /// A display that draws nothing (quiet mode and tests)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Redraws the bar for the given progress
    pub fn update(&self, progress: &RunProgress) {
        self.bar.set_length(progress.total() as u64);
        self.bar.set_position(progress.completed() as u64);
        if progress.is_complete() {
            self.bar.finish();
        }
    }

    /// Leaves the bar as it is and moves to a fresh line
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}
