use super::filter::{FileFilter, FileStat, SkipReason, Verdict};
use crate::config::ScanConfig;
use crate::error::Error;
use crate::model::FileRecord;
use crate::progress::{ProgressReporter, SilentReporter};
use chrono::Utc;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Counters collected while walking one tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub directories_visited: usize,
    pub files_seen: usize,
    /// Symlinks and other non-regular entries.
    pub other_entries: usize,
    pub excluded_by_extension: usize,
    pub excluded_by_name: usize,
    pub unreadable: usize,
    pub below_size: usize,
    pub recently_accessed: usize,
    pub matched: usize,
    pub matched_bytes: u64,
    pub duration: Duration,
}

impl ScanStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::ExcludedExtension => self.excluded_by_extension += 1,
            SkipReason::ExcludedName => self.excluded_by_name += 1,
            SkipReason::Unreadable => self.unreadable += 1,
            SkipReason::BelowSize => self.below_size += 1,
            SkipReason::RecentlyAccessed => self.recently_accessed += 1,
        }
    }

    fn record_match(&mut self, record: &FileRecord) {
        self.matched += 1;
        self.matched_bytes += record.size_bytes;
    }
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    /// False when the walk stopped early on cancellation.
    pub complete: bool,
    pub stats: ScanStats,
}

/// Scan to completion and return the matching records in walk order.
pub fn scan(config: &ScanConfig) -> Result<Vec<FileRecord>, Error> {
    let never_cancelled = AtomicBool::new(false);
    walk(config, &never_cancelled, &SilentReporter).map(|outcome| outcome.records)
}

/// Walk `config.root` and filter every regular file.
///
/// Symlinks are not followed and not reported. Entries inside a directory are
/// visited in file-name order. `cancel` is checked before each entry; once set,
/// the records gathered so far are returned with `complete == false`.
pub fn walk(
    config: &ScanConfig,
    cancel: &AtomicBool,
    reporter: &dyn ProgressReporter,
) -> Result<ScanOutcome, Error> {
    let started = Instant::now();
    let root = config.root.as_path();

    let root_metadata = fs::metadata(root).map_err(|source| Error::Traversal {
        path: root.to_path_buf(),
        source,
    })?;
    if !root_metadata.is_dir() {
        return Err(Error::RootNotDirectory(root.to_path_buf()));
    }

    let filter = FileFilter::new(config, Utc::now());
    let mut records = Vec::new();
    let mut stats = ScanStats::default();
    let mut complete = true;

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        if cancel.load(Ordering::Relaxed) {
            complete = false;
            break;
        }

        let entry = entry.map_err(|err| traversal_error(err, root))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            stats.directories_visited += 1;
            continue;
        }
        if !file_type.is_file() {
            stats.other_entries += 1;
            continue;
        }

        stats.files_seen += 1;
        let name = entry.file_name().to_string_lossy();
        let verdict = filter.evaluate(entry.path(), &name, || {
            let metadata = entry.metadata().map_err(io::Error::from)?;
            FileStat::from_metadata(&metadata)
        });

        match verdict {
            Verdict::Match(record) => {
                stats.record_match(&record);
                records.push(record);
            }
            Verdict::Skip(reason) => stats.record_skip(reason),
        }

        reporter.on_scan_progress(stats.files_seen, &entry.path().to_string_lossy());
    }

    stats.duration = started.elapsed();

    Ok(ScanOutcome {
        records,
        complete,
        stats,
    })
}

fn traversal_error(err: walkdir::Error, root: &Path) -> Error {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    Error::Traversal {
        path,
        source: err.into(),
    }
}
