use crate::constants::{
    EXCLUDED_DIRS, MIN_AVAILABLE_MEMORY_MIB, PROGRESS_REPORT_INTERVAL, TARGET_EXTENSION,
    WORKER_MEMORY_BUDGET_MIB,
};
use crate::error::BatchError;
use crate::policy::CompressionPolicy;
use crate::recompress::{try_recompress, RecompressReport};
use crate::utils::{calculate_compression_ratio, create_batch_progress, format_file_size};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use walkdir::{DirEntry, WalkDir};

/// Where to look and how many workers to use.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub root: PathBuf,
    /// Upper bound on workers; `None` means one per CPU core.
    pub threads: Option<usize>,
}

impl BatchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threads: None,
        }
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Starts a fresh walk over the root. Each call restarts from the top.
    pub fn walk(&self) -> Result<ImageWalker, BatchError> {
        ImageWalker::new(&self.root)
    }

    /// CPU count capped by how many decoded images fit in available memory.
    pub fn worker_count(&self) -> usize {
        let cpus = self.threads.unwrap_or_else(num_cpus::get).max(1);
        let mut sys =
            System::new_with_specifics(RefreshKind::new().with_memory(MemoryRefreshKind::new()));
        sys.refresh_memory();
        let available_mib = sys.available_memory() / (1024 * 1024);
        compute_worker_count(cpus, available_mib)
    }
}

pub fn compute_worker_count(cpus: usize, available_mib: u64) -> usize {
    let mem_cap = available_mib.saturating_sub(MIN_AVAILABLE_MEMORY_MIB) / WORKER_MEMORY_BUDGET_MIB;
    (mem_cap as usize).clamp(1, cpus.max(1))
}

/// Cooperative stop flag, checked between files and never mid-file.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lazy sequence of candidate files under a root.
///
/// Directories named in [`EXCLUDED_DIRS`] are never entered. Entries that
/// cannot be read below the root are reported and skipped.
pub struct ImageWalker {
    inner: walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl ImageWalker {
    pub fn new(root: &Path) -> Result<Self, BatchError> {
        if !root.exists() {
            return Err(BatchError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(BatchError::RootNotDirectory(root.to_path_buf()));
        }
        // Fail early if the root itself cannot be listed
        std::fs::read_dir(root).map_err(|source| BatchError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        Ok(Self {
            inner: WalkDir::new(root)
                .into_iter()
                .filter_entry(is_kept as fn(&DirEntry) -> bool),
        })
    }
}

impl Iterator for ImageWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_candidate(entry.path()) {
                        return Some(entry.into_path());
                    }
                }
                Err(e) => crate::warn!("Skipping unreadable entry: {}", e),
            }
        }
    }
}

fn is_kept(entry: &DirEntry) -> bool {
    !is_excluded_dir(entry)
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| EXCLUDED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Files the batch commands act on: the target codec's extension, any case.
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(TARGET_EXTENSION))
        .unwrap_or(false)
}

/// Terminal state of one file in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Compressed(RecompressReport),
    Failed { path: PathBuf, reason: String },
    /// Not started because the batch was cancelled.
    Skipped { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub compressed: usize,
    pub failed: Vec<(PathBuf, String)>,
    pub skipped: usize,
    pub total_before: u64,
    pub total_after: u64,
}

impl BatchSummary {
    pub fn record(mut self, outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Compressed(report) => {
                self.compressed += 1;
                self.total_before += report.original_size;
                self.total_after += report.compressed_size;
            }
            FileOutcome::Failed { path, reason } => self.failed.push((path, reason)),
            FileOutcome::Skipped { .. } => self.skipped += 1,
        }
        self
    }

    pub fn merge(mut self, other: BatchSummary) -> Self {
        self.compressed += other.compressed;
        self.failed.extend(other.failed);
        self.skipped += other.skipped;
        self.total_before += other.total_before;
        self.total_after += other.total_after;
        self
    }

    pub fn ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_before, self.total_after)
    }

    pub fn print(&self) {
        crate::info!("\n📊 Recompression Summary:");
        crate::info!("  ✅ Compressed: {}", self.compressed);
        crate::info!(
            "  📊 Total size: {} -> {}",
            format_file_size(self.total_before),
            format_file_size(self.total_after)
        );
        crate::info!("  🎯 Overall reduction: {:.1}%", self.ratio());
        if self.skipped > 0 {
            crate::info!("  ⏹️  Not started (cancelled): {}", self.skipped);
        }
        if !self.failed.is_empty() {
            crate::info!("  ⚠️  Failed files: {}", self.failed.len());
        }
    }
}

/// Processes one file and converts every error into an outcome.
pub fn process_file(path: PathBuf, policy: &CompressionPolicy) -> FileOutcome {
    match try_recompress(&path, policy) {
        Ok(report) => FileOutcome::Compressed(report),
        Err(e) => {
            crate::error!("Error compressing {:?}: {}", path, e);
            FileOutcome::Failed {
                reason: e.to_string(),
                path,
            }
        }
    }
}

/// Recompresses every path on a bounded worker pool.
///
/// Paths are pulled lazily from `paths`. One failing file never stops the
/// others; only failing to build the pool is an error.
pub fn recompress_all<I>(
    paths: I,
    policy: &CompressionPolicy,
    config: &BatchConfig,
    cancel: &CancelToken,
) -> Result<BatchSummary, BatchError>
where
    I: Iterator<Item = PathBuf> + Send,
{
    let start_time = Instant::now();
    let workers = config.worker_count();
    crate::info!("⚙️  Using {} parallel workers ({})", workers, policy);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;

    let progress = create_batch_progress();
    let compressed_count = AtomicUsize::new(0);

    let summary = pool.install(|| {
        paths
            .par_bridge()
            .map(|path| {
                if cancel.is_cancelled() {
                    return FileOutcome::Skipped { path };
                }
                let outcome = process_file(path, policy);
                if matches!(outcome, FileOutcome::Compressed(_)) {
                    let done = compressed_count.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_REPORT_INTERVAL == 0 {
                        progress.println(format!("Compressed {} images...", done));
                    }
                }
                progress.inc(1);
                outcome
            })
            .fold(BatchSummary::default, BatchSummary::record)
            .reduce(BatchSummary::default, BatchSummary::merge)
    });

    progress.finish_and_clear();
    crate::verbose!("Batch finished in {:?}", start_time.elapsed());
    Ok(summary)
}
