//! SIGINT handling: an interrupt during review cancels cleanly with status 0

use std::sync::atomic::{AtomicBool, Ordering};

static COPYING: AtomicBool = AtomicBool::new(false);
static PENDING: AtomicBool = AtomicBool::new(false);

fn abort() -> ! {
    eprintln!("\nAborted.");
    std::process::exit(0);
}

/// Install the process-wide handler; later calls are no-ops
pub fn install() {
    let result = ctrlc::set_handler(|| {
        if COPYING.load(Ordering::SeqCst) {
            PENDING.store(true, Ordering::SeqCst);
        } else {
            abort();
        }
    });
    if let Err(e) = result {
        tracing::debug!(error = %e, "interrupt handler not installed");
    }
}

/// Defers interrupts until dropped so a copy batch is never cut short
pub struct CopyGuard(());

impl CopyGuard {
    pub fn enter() -> Self {
        COPYING.store(true, Ordering::SeqCst);
        CopyGuard(())
    }
}

impl Drop for CopyGuard {
    fn drop(&mut self) {
        COPYING.store(false, Ordering::SeqCst);
        if PENDING.swap(false, Ordering::SeqCst) {
            abort();
        }
    }
}
