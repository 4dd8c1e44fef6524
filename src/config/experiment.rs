use super::metric::MetricConfig;
use crate::assoc::AssociationAlgorithm;
use crate::cloud::{CameraIntrinsics, DownSample};
use crate::dataset::{DatasetFormat, Sequence};
use crate::evaluation::AssociationMethod;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the JSON report goes; printed to stdout when absent.
    pub report_json: Option<PathBuf>,
}

/// Configuration shared by the quality and performance tools.
#[derive(Clone, Debug, Deserialize)]
pub struct ExperimentConfig {
    pub depth_dir: PathBuf,
    pub annotation_dir: PathBuf,
    #[serde(default)]
    pub format: DatasetFormat,
    pub intrinsics: CameraIntrinsics,
    /// Raw depth units per scene unit (5000 for TUM/ICL PNGs).
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f64,
    #[serde(default)]
    pub down_sample: DownSample,
    #[serde(default = "default_min_plane_points")]
    pub min_plane_points: usize,
    #[serde(default = "MetricConfig::default_set")]
    pub metrics: Vec<MetricConfig>,
    #[serde(default)]
    pub algorithm: AssociationAlgorithm,
    /// Distance between evaluated frame pairs; each tool has its own default.
    #[serde(default)]
    pub frame_step: Option<usize>,
    /// Timed runs per frame pair in the performance tool.
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_depth_scale() -> f64 {
    5000.0
}

fn default_min_plane_points() -> usize {
    3
}

fn default_repeats() -> usize {
    10
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.depth_scale.is_finite() && self.depth_scale > 0.0) {
            return Err(format!("depth_scale must be positive, got {}", self.depth_scale));
        }
        if self.min_plane_points < 3 {
            return Err(format!(
                "min_plane_points must be at least 3, got {}",
                self.min_plane_points
            ));
        }
        if self.frame_step == Some(0) {
            return Err("frame_step must be positive".to_string());
        }
        if self.metrics.is_empty() {
            return Err("no metrics configured".to_string());
        }
        self.methods().map(|_| ())
    }

    /// One association method per configured metric.
    pub fn methods(&self) -> Result<Vec<AssociationMethod>, String> {
        self.metrics
            .iter()
            .map(|metric| metric.method(self.algorithm))
            .collect()
    }

    pub fn open_sequence(&self) -> Result<Sequence, String> {
        Sequence::open(
            &self.depth_dir,
            &self.annotation_dir,
            self.format,
            self.intrinsics,
            self.depth_scale,
        )
    }
}

pub fn load_config(path: &Path) -> Result<ExperimentConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: ExperimentConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    config
        .validate()
        .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
    Ok(config)
}
