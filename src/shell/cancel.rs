//! Run cancellation.
//!
//! A [`CancelToken`] is a shared flag checked at every suspension point of
//! a run: delay and interval sleeps, and the subprocess wait loop. The
//! process-wide token returned by [`install_interrupt_handler`] is flipped
//! by SIGINT and SIGTERM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

static INTERRUPT: OnceLock<CancelToken> = OnceLock::new();

#[cfg(unix)]
extern "C" fn handle_signal(_signal: libc::c_int) {
    // Only an atomic store happens here.
    if let Some(token) = INTERRUPT.get() {
        token.cancel();
    }
}

/// Install SIGINT/SIGTERM handlers and return the token they cancel.
///
/// Calling this more than once returns the same token.
pub fn install_interrupt_handler() -> CancelToken {
    let token = INTERRUPT.get_or_init(CancelToken::new).clone();

    #[cfg(unix)]
    {
        let handler = handle_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only performs an atomic store on a token that
        // is initialised before the handler is installed.
        unsafe {
            libc::signal(libc::SIGINT, handler);
            libc::signal(libc::SIGTERM, handler);
        }
    }

    token
}
