use crate::error::Error;
use crate::model::FileRecord;
use crate::progress::{ProgressReporter, SilentReporter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    IsDirectory,
    Other,
}

/// Why one path could not be removed.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DeletionFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl DeletionFailure {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self {
                kind: FailureKind::NotFound,
                message: "not found".to_string(),
            },
            io::ErrorKind::PermissionDenied => Self {
                kind: FailureKind::PermissionDenied,
                message: "permission denied".to_string(),
            },
            _ => Self {
                kind: FailureKind::Other,
                message: err.to_string(),
            },
        }
    }

    fn is_directory() -> Self {
        Self {
            kind: FailureKind::IsDirectory,
            message: "is a directory".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub result: Result<(), DeletionFailure>,
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-path results of one batch, in the order the paths were attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &DeletionFailure)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match &outcome.result {
                Ok(()) => None,
                Err(failure) => Some((outcome.path.as_path(), failure)),
            })
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(DeletionOutcome::is_success)
    }
}

/// Remove every path independently. A failure never stops the batch and
/// nothing is rolled back.
pub fn delete_files<I, P>(paths: I) -> DeletionReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    delete_files_with(paths, &SilentReporter)
}

pub fn delete_files_with<I, P>(paths: I, reporter: &dyn ProgressReporter) -> DeletionReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let paths: Vec<PathBuf> = paths
        .into_iter()
        .map(|path| path.as_ref().to_path_buf())
        .collect();
    let total = paths.len();
    reporter.on_delete_start(total);

    let mut outcomes = Vec::with_capacity(total);
    for (done, path) in paths.into_iter().enumerate() {
        let result = remove_file(&path);
        match &result {
            Ok(()) => debug!("deleted: {}", path.display()),
            Err(failure) => error!("Failed to remove '{}': {}", path.display(), failure),
        }
        outcomes.push(DeletionOutcome { path, result });
        reporter.on_delete_progress(done + 1, total);
    }

    let report = DeletionReport { outcomes };
    info!(
        "Deletion executed: {} succeeded, {} failed",
        report.success_count(),
        report.failure_count()
    );
    reporter.on_delete_complete(report.success_count(), report.failure_count());
    report
}

/// Delete the records at `indices` and drop the deleted ones from `records`.
///
/// Every index is validated before anything is touched. Indices are processed
/// from highest to lowest so the remaining ones stay valid while entries are
/// removed. Outcomes come back in ascending index order.
pub fn delete_selected(
    records: &mut Vec<FileRecord>,
    indices: &[usize],
    reporter: &dyn ProgressReporter,
) -> Result<DeletionReport, Error> {
    let len = records.len();
    if let Some(&index) = indices.iter().find(|&&index| index >= len) {
        return Err(Error::InvalidSelection { index, len });
    }

    let mut descending = indices.to_vec();
    descending.sort_unstable_by(|a, b| b.cmp(a));
    descending.dedup();

    let paths: Vec<PathBuf> = descending
        .iter()
        .map(|&index| records[index].path.clone())
        .collect();
    let mut report = delete_files_with(&paths, reporter);

    for (&index, outcome) in descending.iter().zip(&report.outcomes) {
        if outcome.is_success() {
            records.remove(index);
        }
    }

    report.outcomes.reverse();
    Ok(report)
}

fn remove_file(path: &Path) -> Result<(), DeletionFailure> {
    let metadata = fs::symlink_metadata(path).map_err(|err| DeletionFailure::from_io(&err))?;
    if metadata.is_dir() {
        return Err(DeletionFailure::is_directory());
    }
    fs::remove_file(path).map_err(|err| DeletionFailure::from_io(&err))
}
