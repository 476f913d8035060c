use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

/// Exit status of a process stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    CancelScan,
    Exit,
}

/// The first Ctrl-C during a scan cancels it; any other Ctrl-C exits.
fn on_interrupt(cancel: &AtomicBool, scanning: &AtomicBool) -> InterruptAction {
    if scanning.load(Ordering::SeqCst) && !cancel.swap(true, Ordering::SeqCst) {
        InterruptAction::CancelScan
    } else {
        InterruptAction::Exit
    }
}

/// Routes Ctrl-C to a scan's cancel token while the guard is alive.
pub struct ScanInterrupt {
    scanning: Arc<AtomicBool>,
}

impl ScanInterrupt {
    pub fn install(cancel: Arc<AtomicBool>) -> Self {
        let scanning = Arc::new(AtomicBool::new(true));
        let watched = scanning.clone();

        let spawned = thread::Builder::new()
            .name("ctrl-c".to_string())
            .spawn(move || watch(cancel, watched));
        if let Err(err) = spawned {
            warn!("Ctrl-C will not cancel the scan: {}", err);
        }

        Self { scanning }
    }
}

impl Drop for ScanInterrupt {
    fn drop(&mut self) {
        self.scanning.store(false, Ordering::SeqCst);
    }
}

fn watch(cancel: Arc<AtomicBool>, scanning: Arc<AtomicBool>) {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            warn!("Ctrl-C will not cancel the scan: {}", err);
            return;
        }
    };

    runtime.block_on(async move {
        loop {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", err);
                return;
            }
            match on_interrupt(&cancel, &scanning) {
                InterruptAction::CancelScan => {
                    warn!("Interrupted; stopping the scan (press Ctrl-C again to quit)")
                }
                InterruptAction::Exit => {
                    debug!("Interrupted; exiting");
                    process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        }
    });
}
