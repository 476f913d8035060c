use crate::config::ScanConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner::{self, ScanOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ScanEngine {
    config: ScanConfig,
    cancel: Arc<AtomicBool>,
}

impl ScanEngine {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Shared flag that stops a running scan at the next directory entry.
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Walk the configured root and collect large, unused files.
    ///
    /// The cancel flag is cleared on entry, so a token set before the call has
    /// no effect.
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanOutcome, Error> {
        self.cancel.store(false, Ordering::Relaxed);

        let root = self.config.root.to_string_lossy();
        info!("Scanning {}...", root);
        debug!(
            "min size {} bytes, {} months unused, excluded extensions {:?}, excluded names {:?}",
            self.config.min_size_bytes,
            self.config.months_unused,
            self.config.excluded_extensions,
            self.config.excluded_name_prefixes,
        );

        reporter.on_scan_start(&root);
        let outcome = scanner::walk(&self.config, &self.cancel, reporter)?;
        let stats = &outcome.stats;

        debug!(
            "Scan finished in {:.2}s: {} directories, {} files, {} excluded by extension, \
             {} excluded by name, {} unreadable, {} below size, {} recently accessed",
            stats.duration.as_secs_f64(),
            stats.directories_visited,
            stats.files_seen,
            stats.excluded_by_extension,
            stats.excluded_by_name,
            stats.unreadable,
            stats.below_size,
            stats.recently_accessed,
        );

        if outcome.complete {
            info!(
                "{} large and unused files ({} bytes)",
                stats.matched, stats.matched_bytes
            );
        } else {
            warn!(
                "Scan cancelled after {} files; {} matches so far",
                stats.files_seen, stats.matched
            );
        }

        reporter.on_scan_complete(stats.matched, stats.duration.as_secs_f64());
        Ok(outcome)
    }
}
