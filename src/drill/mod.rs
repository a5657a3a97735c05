pub mod runner;

pub use runner::{run_drill, DrillConfig, DrillReport};
