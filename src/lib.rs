pub mod config;
pub mod error;
pub mod limiter;
pub mod drill;
pub mod analytics;
pub mod utils;

pub use error::LimiterError;
pub use limiter::{Acquire, Limiter, LimiterSnapshot};
