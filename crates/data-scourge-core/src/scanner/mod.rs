mod filter;
mod walk;

pub use filter::{months_since_access, to_utc, FileFilter, FileStat, SkipReason, Verdict};
pub use walk::{scan, walk, ScanOutcome, ScanStats};
