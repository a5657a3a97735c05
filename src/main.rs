use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inflight_limiter::analytics::stats::ConcurrencyStats;
use inflight_limiter::config::Config;
use inflight_limiter::drill::{run_drill, DrillConfig};
use inflight_limiter::error::Result;
use inflight_limiter::limiter::Limiter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load Config
    let config = Config::load()?;

    // Initialize logging, RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting in-flight limiter drill...");
    info!("Configuration loaded. Capacity: {}, Tasks: {}, Delay: {}ms", config.capacity, config.tasks, config.task_delay_ms);

    let limiter = Limiter::new(config.capacity)?;
    let stats = Arc::new(ConcurrencyStats::new());

    let report = run_drill(&limiter, &DrillConfig::from(&config), stats.clone()).await?;

    stats.log_stats();
    info!(
        "Peak concurrency {} of {} | Final concurrency {} | Limiter after run: {:?}",
        report.peak_concurrency, limiter.capacity(), report.final_concurrency, report.limiter
    );

    Ok(())
}
