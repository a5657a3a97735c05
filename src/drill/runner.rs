use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use futures_util::future::join_all;
use tracing::{info, debug, warn};

use crate::analytics::stats::ConcurrencyStats;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::limiter::{Limiter, LimiterSnapshot};
use crate::utils::time::{elapsed_ms, now_instant};

#[derive(Debug, Clone)]
pub struct DrillConfig {
    pub tasks: usize,
    pub task_delay: Duration,
    pub fail_every: u64, // 0 = no task fails
}

impl From<&Config> for DrillConfig {
    fn from(config: &Config) -> Self {
        Self {
            tasks: config.tasks,
            task_delay: Duration::from_millis(config.task_delay_ms),
            fail_every: config.fail_every,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrillReport {
    pub peak_concurrency: u64,
    pub final_concurrency: u64,
    pub completed: u64,
    pub failed: u64,
    pub elapsed_ms: u64,
    pub limiter: LimiterSnapshot,
}

/// Spawns `tasks` units of fixed-delay work, each gated by `limiter`, and
/// waits for all of them.
pub async fn run_drill(limiter: &Limiter, drill: &DrillConfig, stats: Arc<ConcurrencyStats>) -> Result<DrillReport> {
    info!("Drill starting: {} tasks, capacity {}, delay {:?}", drill.tasks, limiter.capacity(), drill.task_delay);
    let start = now_instant();

    let mut handles = Vec::with_capacity(drill.tasks);
    for index in 0..drill.tasks {
        let limiter = limiter.clone();
        let stats = stats.clone();
        let delay = drill.task_delay;
        let fails = drill.fail_every > 0 && (index as u64 + 1) % drill.fail_every == 0;

        handles.push(tokio::spawn(async move {
            limiter
                .run_scoped(move || async move {
                    stats.enter();
                    debug!("Task {} running ({} in flight)", index, stats.current());
                    tokio::time::sleep(delay).await;
                    stats.exit();

                    if fails {
                        return Err(AppError::Task(format!("task {} failed on purpose", index)));
                    }
                    Ok(())
                })
                .await
        }));
    }

    for joined in join_all(handles).await {
        match joined? {
            Ok(()) => stats.inc_completed(),
            Err(e) => {
                warn!("Task error: {}", e);
                stats.inc_failed();
            }
        }
    }

    let report = DrillReport {
        peak_concurrency: stats.peak(),
        final_concurrency: stats.current(),
        completed: stats.completed_tasks.load(Ordering::Relaxed),
        failed: stats.failed_tasks.load(Ordering::Relaxed),
        elapsed_ms: elapsed_ms(start),
        limiter: limiter.snapshot(),
    };
    info!("Drill finished in {}ms", report.elapsed_ms);

    Ok(report)
}
