//! Timing data recorded by the experiment tools.

pub mod timing;

pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
