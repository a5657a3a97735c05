use std::future::Future;
use tracing::error;

use crate::limiter::gate::Limiter;

/// Holds one slot and gives it back when dropped.
struct ScopedSlot<'a> {
    limiter: &'a Limiter,
}

impl Drop for ScopedSlot<'_> {
    fn drop(&mut self) {
        // Acquire and release are paired 1:1 here, so this only fails on a
        // limiter bug. It must not replace the task's own outcome.
        if let Err(e) = self.limiter.release() {
            error!("Scoped release failed: {}", e);
        }
    }
}

impl Limiter {
    /// Runs `task` while holding a slot.
    ///
    /// The slot is released exactly once before the result is returned,
    /// whether the task succeeds, returns an error, panics or is dropped
    /// mid-flight. Fallible work should return a `Result`; it is passed
    /// through unchanged.
    pub async fn run_scoped<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.acquire().await;
        let _slot = ScopedSlot { limiter: self };
        task().await
    }
}
