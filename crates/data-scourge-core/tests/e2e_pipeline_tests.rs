use std::fs::{self, File, FileTimes};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

use data_scourge_core::deletion::delete_selected;
use data_scourge_core::{ProgressReporter, ScanConfig, ScanEngine, ScanInput, SilentReporter};

const DAY: u64 = 24 * 60 * 60;

fn create_file(path: &Path, size: u64, days_ago: u64) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    file.set_len(size).unwrap();
    let stamp = SystemTime::now() - Duration::from_secs(days_ago * DAY);
    file.set_times(FileTimes::new().set_accessed(stamp).set_modified(stamp))
        .unwrap();
}

/// Layout:
///   root/
///     archive/
///       dump_2019.sql      (3 MB, 400 days)
///       notes.txt          (3 MB, 400 days)  excluded by extension
///     media/
///       movie.mkv          (5 MB, 250 days)
///       Old_movie.mkv      (5 MB, 250 days)  excluded by name
///     work/
///       current.psd        (8 MB, 2 days)    recently used
///       thumb.psd          (1 KB, 400 days)  too small
fn create_test_tree(root: &Path) {
    let mb = 1024 * 1024;
    create_file(&root.join("archive/dump_2019.sql"), 3 * mb, 400);
    create_file(&root.join("archive/notes.txt"), 3 * mb, 400);
    create_file(&root.join("media/movie.mkv"), 5 * mb, 250);
    create_file(&root.join("media/Old_movie.mkv"), 5 * mb, 250);
    create_file(&root.join("work/current.psd"), 8 * mb, 2);
    create_file(&root.join("work/thumb.psd"), 1024, 400);
}

fn input_for(root: &Path) -> ScanInput {
    ScanInput {
        root: root.to_string_lossy().into_owned(),
        min_size_mb: "2".to_string(),
        months_unused: " 6 ".to_string(),
        exclude_extensions: ".txt, .pdf".to_string(),
        exclude_names: "backup, old".to_string(),
    }
}

#[test]
fn test_full_scan_and_delete_pipeline() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    create_test_tree(&root);

    let config = ScanConfig::from_input(&input_for(&root)).unwrap();
    let engine = ScanEngine::new(config);
    let outcome = engine.scan(&SilentReporter).unwrap();

    assert!(outcome.complete);
    let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["dump_2019.sql", "movie.mkv"]);
    assert_eq!(outcome.stats.files_seen, 6);

    let mut records = outcome.records;
    let report = delete_selected(&mut records, &[1], &SilentReporter).unwrap();
    assert!(report.is_complete_success());
    assert!(!root.join("media/movie.mkv").exists());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "dump_2019.sql");

    // Excluded and unflagged files are untouched.
    assert!(root.join("media/Old_movie.mkv").exists());
    assert!(root.join("work/current.psd").exists());

    let rescan = engine.scan(&SilentReporter).unwrap();
    let names: Vec<_> = rescan.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["dump_2019.sql"]);
}

#[test]
fn test_no_matches_is_distinct_from_failure() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("quiet");
    create_file(&root.join("small.bin"), 10, 400);

    let config = ScanConfig::from_input(&input_for(&root)).unwrap();
    let outcome = ScanEngine::new(config).scan(&SilentReporter).unwrap();
    assert!(outcome.complete);
    assert!(outcome.records.is_empty());

    let missing = ScanConfig::from_input(&input_for(&tmp.path().join("nope"))).unwrap();
    assert!(ScanEngine::new(missing).scan(&SilentReporter).is_err());
}

#[test]
fn test_invalid_input_never_reaches_the_scanner() {
    let tmp = tempdir().unwrap();
    let mut input = input_for(tmp.path());
    input.months_unused = "six".to_string();
    assert!(ScanConfig::from_input(&input).is_err());
}

/// Cancels the scan as soon as `stop_after` files have been seen.
struct CancelAfter {
    token: Arc<AtomicBool>,
    stop_after: usize,
    seen: Mutex<Vec<String>>,
}

impl ProgressReporter for CancelAfter {
    fn on_scan_progress(&self, files_seen: usize, current_path: &str) {
        self.seen.lock().unwrap().push(current_path.to_string());
        if files_seen >= self.stop_after {
            self.token.store(true, Ordering::Relaxed);
        }
    }
}

#[test]
fn test_scan_cancellation_returns_partial_results() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_cancel");
    for name in ["a.bin", "b.bin", "c.bin", "d.bin"] {
        create_file(&root.join(name), 10, 60);
    }

    let engine = ScanEngine::new(ScanConfig::new(&root).with_months_unused(1));
    let reporter = CancelAfter {
        token: engine.cancel_token(),
        stop_after: 2,
        seen: Mutex::new(Vec::new()),
    };

    let outcome = engine.scan(&reporter).unwrap();
    assert!(!outcome.complete);
    assert_eq!(outcome.stats.files_seen, 2);
    let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a.bin", "b.bin"]);
    assert_eq!(reporter.seen.lock().unwrap().len(), 2);
}

#[test]
fn test_cancel_before_scan_is_cleared() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_reset");
    create_file(&root.join("a.bin"), 10, 60);

    let engine = ScanEngine::new(ScanConfig::new(&root).with_months_unused(1));
    engine.cancel_token().store(true, Ordering::Relaxed);

    let outcome = engine.scan(&SilentReporter).unwrap();
    assert!(outcome.complete);
    assert_eq!(outcome.records.len(), 1);
}
