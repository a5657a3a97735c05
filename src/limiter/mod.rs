pub mod acquire;
pub mod gate;
pub mod scoped;

pub use acquire::Acquire;
pub use gate::{Limiter, LimiterSnapshot};
