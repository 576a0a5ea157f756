//! Per-folder progress bars for the parallel file batches

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "{{msg}} [{{elapsed_precise}}] [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} files ({{eta}})"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for the per-folder batches of both phases
///
/// One bar is created per folder and phase; bars are hidden entirely when
/// progress output is disabled.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProgressManager {
    /// Create a progress manager, optionally suppressing all output
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Progress manager that draws nothing
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Whether bars are drawn
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a bar for one folder's batch of `file_count` files
    pub fn start_batch(&self, phase: &str, folder: &Path, file_count: usize) -> ProgressBar {
        if !self.is_enabled() {
            return ProgressBar::hidden();
        }

        let display_name = folder
            .file_name()
            .unwrap_or(folder.as_os_str())
            .to_string_lossy()
            .to_string();
        let bar = self
            .multi_progress
            .add(ProgressBar::new(file_count as u64));
        bar.set_style(BATCH_STYLE.clone());
        bar.set_message(format!("{phase} {display_name}"));
        bar
    }

    /// Finish a batch bar and remove it from the display
    pub fn finish_batch(&self, bar: &ProgressBar) {
        bar.finish_and_clear();
        self.multi_progress.remove(bar);
    }
}
