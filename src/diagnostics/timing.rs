use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Timing entry for one labelled unit of work, e.g. associating one frame
/// pair with one metric.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace of an experiment run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Mean stage duration, `None` when nothing was recorded.
    pub fn mean_ms(&self) -> Option<f64> {
        if self.stages.is_empty() {
            None
        } else {
            Some(self.total_ms / self.stages.len() as f64)
        }
    }
}

/// Milliseconds elapsed since `start`.
#[inline]
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_accumulates_total() {
        let mut timing = TimingBreakdown::default();
        assert_eq!(timing.mean_ms(), None);
        timing.push("frame 0", 2.0);
        timing.push("frame 10", 4.0);
        assert_eq!(timing.total_ms, 6.0);
        assert_eq!(timing.mean_ms(), Some(3.0));
        assert_eq!(timing.stages[1].label, "frame 10");
    }

    #[test]
    fn serializes_in_camel_case() {
        let mut timing = TimingBreakdown::default();
        timing.push("frame 0", 1.5);
        let json = serde_json::to_string(&timing).unwrap();
        assert!(json.contains("\"totalMs\":1.5"));
        assert!(json.contains("\"elapsedMs\":1.5"));
    }
}
