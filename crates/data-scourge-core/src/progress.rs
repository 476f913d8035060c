/// Trait for reporting scan and deletion progress.
///
/// The CLI implements it with indicatif bars; library callers that do not care
/// use [`SilentReporter`]. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self, _root: &str) {}
    fn on_scan_progress(&self, _files_seen: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _matched: usize, _duration_secs: f64) {}
    fn on_delete_start(&self, _total: usize) {}
    fn on_delete_progress(&self, _done: usize, _total: usize) {}
    fn on_delete_complete(&self, _succeeded: usize, _failed: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
