//! Parallel batch analysis
//!
//! Files are analyzed independently on a rayon pool capped at `max_jobs`
//! workers. A failing file records its error kind and the batch moves on. Once
//! the cancel flag is raised, files that have not started are reported as
//! cancelled while finished results are kept.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{AnalysisConfig, AnalysisOptions};
use crate::error::ErrorKind;

use super::compatibility::compare;
use super::result::{CompatibilityResult, GrooveAnalysis};

/// Called after each file with its report and the number of files finished so far
pub type ProgressCallback = dyn Fn(&FileReport, usize) + Send + Sync;

/// Batch execution options
#[derive(Clone)]
pub struct BatchOptions {
    /// Maximum number of files analyzed concurrently (at least 1)
    pub max_jobs: usize,

    /// Cooperative cancellation flag, checked before each file starts
    pub cancel: Option<Arc<AtomicBool>>,

    /// Score pairwise compatibility across the successful analyses
    pub compare: bool,

    /// Progress hook, run on the worker thread that finished the file
    pub on_progress: Option<Arc<ProgressCallback>>,
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("max_jobs", &self.max_jobs)
            .field("cancel", &self.cancel)
            .field("compare", &self.compare)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_jobs: default_jobs(),
            cancel: None,
            compare: false,
            on_progress: None,
        }
    }
}

/// Available CPU threads minus one, keeping one core free
pub fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

/// Outcome of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Analysis completed (possibly with an insufficient-signal flag)
    Analyzed {
        /// The analysis result
        analysis: Box<GrooveAnalysis>,
    },
    /// Decoding or analysis failed
    Failed {
        /// Error classification
        kind: ErrorKind,
        /// Error message
        message: String,
    },
    /// Not started before the batch was cancelled
    Cancelled,
}

/// Outcome of one file with its path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// Input path
    pub path: PathBuf,

    /// What happened to the file
    pub outcome: FileOutcome,
}

/// Result of a batch run, files in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-file outcomes in input order
    pub files: Vec<FileReport>,

    /// Compatibility across successful analyses (when requested and at least two succeeded)
    pub compatibility: Option<CompatibilityResult>,
}

impl BatchReport {
    /// Successful analyses keyed by path, in input order
    pub fn successes(&self) -> Vec<(String, &GrooveAnalysis)> {
        self.files
            .iter()
            .filter_map(|f| match &f.outcome {
                FileOutcome::Analyzed { analysis } => Some((f.path.display().to_string(), analysis.as_ref())),
                _ => None,
            })
            .collect()
    }

    /// Number of files that failed
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
            .count()
    }

    /// Number of files skipped by cancellation
    pub fn cancelled_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Cancelled))
            .count()
    }
}

fn analyze_one(
    path: &Path,
    options: &AnalysisOptions,
    config: &AnalysisConfig,
    cancel: Option<&AtomicBool>,
) -> FileOutcome {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return FileOutcome::Cancelled;
    }

    match crate::analyze_file(path, options, config) {
        Ok(analysis) => FileOutcome::Analyzed {
            analysis: Box::new(analysis),
        },
        Err(e) => {
            log::warn!("Batch: {} failed: {}", path.display(), e);
            FileOutcome::Failed {
                kind: e.kind(),
                message: e.to_string(),
            }
        }
    }
}

/// Analyze many files in parallel
///
/// # Arguments
///
/// * `paths` - Input files
/// * `options` - Per-file analysis options
/// * `config` - Analysis configuration shared by all files
/// * `batch` - Worker cap, cancellation flag, compatibility switch and progress hook
///
/// # Returns
///
/// `BatchReport` with one outcome per input path, in input order. Per-file
/// failures never abort the batch.
pub fn analyze_batch<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &AnalysisOptions,
    config: &AnalysisConfig,
    batch: &BatchOptions,
) -> BatchReport {
    let jobs = batch.max_jobs.max(1);
    let cancel = batch.cancel.as_deref();
    let progress = batch.on_progress.as_deref();
    let completed = AtomicUsize::new(0);
    let total = paths.len();

    log::debug!("Batch: {} files, jobs={}", total, jobs);

    let run = |path: &P| {
        let path = path.as_ref();
        let outcome = analyze_one(path, options, config, cancel);
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("Batch: [{}/{}] {}", done, total, path.display());
        let report = FileReport {
            path: path.to_path_buf(),
            outcome,
        };
        if let Some(callback) = progress {
            callback(&report, done);
        }
        report
    };

    let files: Vec<FileReport> = match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| paths.par_iter().map(run).collect::<Vec<_>>()),
        Err(e) => {
            log::warn!("Batch: thread pool unavailable ({}), analyzing sequentially", e);
            paths.iter().map(run).collect()
        }
    };

    let mut report = BatchReport {
        files,
        compatibility: None,
    };

    if batch.compare {
        let successes: Vec<(String, GrooveAnalysis)> = report
            .successes()
            .into_iter()
            .map(|(id, analysis)| (id, analysis.clone()))
            .collect();
        if successes.len() >= 2 {
            match compare(&successes, config) {
                Ok(result) => report.compatibility = Some(result),
                Err(e) => log::warn!("Batch: compatibility skipped: {}", e),
            }
        } else {
            log::warn!(
                "Batch: compatibility needs 2 successful analyses, got {}",
                successes.len()
            );
        }
    }

    log::debug!(
        "Batch done: {} analyzed, {} failed, {} cancelled",
        report.successes().len(),
        report.failed_count(),
        report.cancelled_count()
    );

    report
}
