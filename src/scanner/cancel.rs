use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use nix::sys::signal::{self, SigHandler, Signal};

/// Cooperative cancellation flag checked by walkers at every directory.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

static INTERRUPT: OnceLock<CancelToken> = OnceLock::new();

/// Route SIGINT and SIGTERM to `token`.
///
/// The first signal only cancels; the handler then restores the default
/// disposition so a second one terminates the process. Only the first
/// installed token is wired up.
pub fn install_interrupt_handler(token: &CancelToken) -> nix::Result<()> {
    if INTERRUPT.set(token.clone()).is_err() {
        return Ok(());
    }

    // SAFETY: the handler only touches an atomic flag and calls signal(2),
    // both async-signal-safe.
    unsafe {
        signal::signal(Signal::SIGINT, SigHandler::Handler(handle_interrupt))?;
        signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_interrupt))?;
    }

    Ok(())
}

extern "C" fn handle_interrupt(signum: i32) {
    if let Some(token) = INTERRUPT.get() {
        token.cancel();
    }
    if let Ok(sig) = Signal::try_from(signum) {
        unsafe {
            let _ = signal::signal(sig, SigHandler::SigDfl);
        }
    }
}
