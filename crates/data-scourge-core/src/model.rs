use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One file flagged by a scan. Fresh per scan, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub name: String,
    /// Unique within one scan.
    pub path: PathBuf,
    pub size_bytes: u64,
    pub last_accessed: DateTime<Utc>,
}

impl FileRecord {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB
    }
}
