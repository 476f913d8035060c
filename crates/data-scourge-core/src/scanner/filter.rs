use crate::config::ScanConfig;
use crate::model::FileRecord;
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const DAYS_PER_MONTH: i64 = 30;

/// Size and last-access time read from the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size_bytes: u64,
    pub accessed: SystemTime,
}

impl FileStat {
    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        Ok(Self {
            size_bytes: metadata.len(),
            accessed: metadata.accessed()?,
        })
    }
}

/// Why a file did not make it into the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    ExcludedExtension,
    ExcludedName,
    /// Size or access time could not be read. Not an error.
    Unreadable,
    BelowSize,
    RecentlyAccessed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Match(FileRecord),
    Skip(SkipReason),
}

/// Whole 30-day months between `accessed` and `now`.
///
/// Days are floored first, then months, so an access time in the future gives
/// a negative count that never meets a threshold.
pub fn months_since_access(accessed: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - accessed).num_milliseconds();
    elapsed_ms
        .div_euclid(MILLIS_PER_DAY)
        .div_euclid(DAYS_PER_MONTH)
}

/// `None` when the time is outside the range chrono can represent.
pub fn to_utc(time: SystemTime) -> Option<DateTime<Utc>> {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => {
            let secs = i64::try_from(after.as_secs()).ok()?;
            DateTime::from_timestamp(secs, after.subsec_nanos())
        }
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => DateTime::from_timestamp(-secs, 0),
                nanos => DateTime::from_timestamp(-secs - 1, 1_000_000_000 - nanos),
            }
        }
    }
}

/// The per-file predicate pipeline, evaluated against a fixed `now`.
pub struct FileFilter<'a> {
    config: &'a ScanConfig,
    now: DateTime<Utc>,
}

impl<'a> FileFilter<'a> {
    pub fn new(config: &'a ScanConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    pub fn is_excluded_extension(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.config
            .excluded_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.config
            .excluded_name_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Run the filters in order. `stat` is only called once both exclusion
    /// checks have passed.
    pub fn evaluate<F>(&self, path: &Path, name: &str, stat: F) -> Verdict
    where
        F: FnOnce() -> io::Result<FileStat>,
    {
        if self.is_excluded_extension(path) {
            return Verdict::Skip(SkipReason::ExcludedExtension);
        }
        if self.is_excluded_name(name) {
            return Verdict::Skip(SkipReason::ExcludedName);
        }

        let stat = match stat() {
            Ok(stat) => stat,
            Err(err) => {
                debug!("Skipping unreadable file {}: {}", path.display(), err);
                return Verdict::Skip(SkipReason::Unreadable);
            }
        };

        if stat.size_bytes <= self.config.min_size_bytes {
            return Verdict::Skip(SkipReason::BelowSize);
        }

        let Some(last_accessed) = to_utc(stat.accessed) else {
            debug!("Skipping {}: access time out of range", path.display());
            return Verdict::Skip(SkipReason::Unreadable);
        };
        if months_since_access(last_accessed, self.now) < i64::from(self.config.months_unused) {
            return Verdict::Skip(SkipReason::RecentlyAccessed);
        }

        Verdict::Match(FileRecord {
            name: name.to_string(),
            path: path.to_path_buf(),
            size_bytes: stat.size_bytes,
            last_accessed,
        })
    }
}
