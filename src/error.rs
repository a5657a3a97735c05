use thiserror::Error;

/// Contract violations raised by [`crate::limiter::Limiter`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterError {
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(i64),

    #[error("Release called with no occupied slots")]
    OverRelease,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Limiter error: {0}")]
    Limiter(#[from] LimiterError),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
