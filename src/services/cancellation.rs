//! Cooperative cancellation shared by the driver, the orchestrator, and
//! every engine call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle that signals shutdown. Clones share one flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    stop_flag: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown. Idempotent.
    pub fn cancel(&self) {
        self.stop_flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop_flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_cancelled());

        flag.cancel();
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
