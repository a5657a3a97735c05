use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Tracks how much limited work is running at once.
#[derive(Debug, Default)]
pub struct ConcurrencyStats {
    pub in_flight: AtomicU64,
    pub peak_in_flight: AtomicU64,
    pub completed_tasks: AtomicU64,
    pub failed_tasks: AtomicU64,
}

impl ConcurrencyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a task as running and folds the new level into the peak.
    pub fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    pub fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn inc_completed(&self) {
        self.completed_tasks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failed(&self) {
        self.failed_tasks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn current(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> u64 {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn log_stats(&self) {
        let current = self.current();
        let peak = self.peak();
        let completed = self.completed_tasks.load(Ordering::Relaxed);
        let failed = self.failed_tasks.load(Ordering::Relaxed);

        info!(
            "STATS: In flight: {} (peak {}) | Tasks: {} Completed, {} Failed",
            current, peak, completed, failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_stats_concurrency() {
        let stats = Arc::new(ConcurrencyStats::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let stats = stats.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    stats.enter();
                    stats.inc_completed();
                    stats.exit();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.completed_tasks.load(Ordering::Relaxed), 1000);
        assert_eq!(stats.current(), 0);
        assert!(stats.peak() >= 1 && stats.peak() <= 10);
    }

    #[test]
    fn test_peak_tracks_highest_level() {
        let stats = ConcurrencyStats::new();

        stats.enter();
        stats.enter();
        stats.enter();
        stats.exit();
        stats.exit();
        stats.enter();

        assert_eq!(stats.current(), 2);
        assert_eq!(stats.peak(), 3);
    }
}
