use serde::Deserialize;
use config::{Config as ConfigLoader, Environment};
use crate::error::Result;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // General
    pub log_level: String,

    // Limiter
    pub capacity: i64, // Signed so that a bad GATE_CAPACITY reaches Limiter::new and fails there

    // Drill
    pub tasks: usize,
    pub task_delay_ms: u64,
    pub fail_every: u64, // 0 = no task fails
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let config = ConfigLoader::builder()
            .set_default("log_level", "info")?
            .set_default("capacity", 10_i64)?
            .set_default("tasks", 20_i64)?
            .set_default("task_delay_ms", 50_i64)?
            .set_default("fail_every", 0_i64)?
            // GATE_CAPACITY, GATE_TASKS, GATE_TASK_DELAY_MS, ...
            .add_source(Environment::with_prefix("GATE").try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::load().unwrap();

        // Defaults hold unless the environment running the tests overrides them.
        if std::env::var("GATE_CAPACITY").is_err() {
            assert_eq!(config.capacity, 10);
        }
        if std::env::var("GATE_FAIL_EVERY").is_err() {
            assert_eq!(config.fail_every, 0);
        }
        assert!(!config.log_level.is_empty());
    }
}
