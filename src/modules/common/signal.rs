use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Caller-supplied cancellation signal for a running batch.
///
/// Cancelling stops new sends from being started; sends already handed to the
/// transport are allowed to finish, and the batch still returns a report
/// covering everything that was started.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
