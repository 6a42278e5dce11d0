//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::CrackError;

/// One-way flag polled by workers between candidates.
///
/// Clones share the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag. Returns `true` only for the call that set it.
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Cancel `token` when the process receives Ctrl-C.
pub fn install_interrupt_handler(token: CancellationToken) -> Result<(), CrackError> {
    ctrlc::set_handler(move || {
        if token.cancel() {
            warn!("interrupt received, stopping workers");
        }
    })
    .map_err(|e| CrackError::Interrupt(e.to_string()))
}
