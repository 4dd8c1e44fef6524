//! JSON configuration for the experiment tools.

pub mod experiment;
pub mod metric;

pub use experiment::{load_config, ExperimentConfig, OutputConfig};
pub use metric::MetricConfig;
