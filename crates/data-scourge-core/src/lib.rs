pub mod config;
pub mod deletion;
pub mod engine;
pub mod error;
pub mod model;
pub mod progress;
pub mod scanner;

pub use config::{ScanConfig, ScanInput};
pub use deletion::{delete_files, DeletionOutcome, DeletionReport};
pub use engine::ScanEngine;
pub use error::Error;
pub use model::FileRecord;
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::{ScanOutcome, ScanStats};
