//! Cooperative query cancellation.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shareable flag aborting in-flight queries.
///
/// Cancellation is coarse-grained: queries observe the token at partition
/// boundaries only, and a cancelled query produces no partial output.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every query holding a clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Checks whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
