//! Bounded per-folder worker pool running one task per file

use crate::io::configuration::WORKER_THREAD_PREFIX;
use crate::io::error::Result;
use indicatif::ProgressBar;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Runs per-file tasks for one folder on a dedicated thread pool
///
/// The pool lives for a single batch. The calling thread blocks until every
/// task has finished or the first failure has been observed.
pub struct FolderExecutor {
    threads: Option<usize>,
}

impl FolderExecutor {
    /// Executor with `threads` workers per batch, or one per CPU when `None`
    pub const fn new(threads: Option<usize>) -> Self {
        Self { threads }
    }

    /// Apply `task` to every file, returning results in file order
    ///
    /// Fail-fast: the first error is returned and tasks not yet started are
    /// abandoned. `progress` advances once per finished task.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot start or any task fails
    pub fn run<T, F>(&self, files: &[PathBuf], progress: &ProgressBar, task: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync,
    {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .thread_name(|index| format!("{WORKER_THREAD_PREFIX}-{index}"))
            .build()?;

        pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let outcome = task(file);
                    progress.inc(1);
                    outcome
                })
                .collect()
        })
    }
}
