use super::{normal_cos, offset_distance, OverlapSimilarity, PlaneMetric};
use crate::plane::{jaccard_index, Plane};
use serde::{Deserialize, Serialize};

/// Angle/offset gated overlap metric.
///
/// A pair is admissible when `|cos(n_prev, n_cur)| > cos(limit_angle)` and
/// `|d_prev − d_cur| < limit_distance`. Admissible pairs score
/// `1 − jaccard(prev, cur)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JaccardThresholded {
    /// Maximum angle between normals in radians.
    pub limit_angle: f64,
    /// Maximum offset difference in scene units.
    pub limit_distance: f64,
}

impl Default for JaccardThresholded {
    fn default() -> Self {
        Self {
            limit_angle: std::f64::consts::PI / 18.0,
            limit_distance: 0.1,
        }
    }
}

impl JaccardThresholded {
    pub fn new(limit_angle: f64, limit_distance: f64) -> Self {
        Self {
            limit_angle,
            limit_distance,
        }
    }

    /// Whether the two planes pass the angle and offset gate.
    pub fn admissible(&self, prev: &Plane, cur: &Plane) -> bool {
        let angle_cos = normal_cos(cur, prev);
        let distance = offset_distance(cur, prev);
        angle_cos.abs() > self.limit_angle.cos() && distance < self.limit_distance
    }
}

impl PlaneMetric for JaccardThresholded {
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        self.admissible(prev, cur)
            .then(|| 1.0 - jaccard_index(cur.point_indices(), prev.point_indices()))
    }

    fn name(&self) -> &'static str {
        "jaccard_thresholded"
    }
}

impl OverlapSimilarity for JaccardThresholded {
    fn similarity(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        self.admissible(prev, cur)
            .then(|| jaccard_index(cur.point_indices(), prev.point_indices()))
    }

    fn name(&self) -> &'static str {
        "jaccard_thresholded"
    }
}

/// Soft angle/offset/overlap metric without an admissibility gate.
///
/// Score: `(1 − cos) · angle_weight + |Δd| + (1 − jaccard) · jaccard_weight`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct JaccardWeighted {
    pub angle_weight: f64,
    pub jaccard_weight: f64,
}

impl Default for JaccardWeighted {
    fn default() -> Self {
        Self {
            angle_weight: 5.0,
            jaccard_weight: 2.0,
        }
    }
}

impl JaccardWeighted {
    pub fn new(angle_weight: f64, jaccard_weight: f64) -> Self {
        Self {
            angle_weight,
            jaccard_weight,
        }
    }
}

impl PlaneMetric for JaccardWeighted {
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        let angle_cos = normal_cos(cur, prev);
        let distance = offset_distance(cur, prev);
        let jaccard = jaccard_index(prev.point_indices(), cur.point_indices());
        Some(
            (1.0 - angle_cos) * self.angle_weight
                + distance
                + (1.0 - jaccard) * self.jaccard_weight,
        )
    }

    fn name(&self) -> &'static str {
        "jaccard_weighted"
    }
}
