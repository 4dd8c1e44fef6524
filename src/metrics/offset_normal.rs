use super::PlaneMetric;
use crate::plane::Plane;
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-12;

/// Compares the offset-scaled normals of two planes.
///
/// Both offsets are measured as `|p₀ · n_cur|`, where `p₀` is the first
/// point of the respective plane and `n_cur` is the normal of the *current*
/// plane. The previous plane's own normal is not used for its offset; this
/// asymmetry is kept as is because changing it alters matching outcomes.
///
/// A pair is admissible when `n_cur · n_prev > dot_threshold` and the
/// relative offset difference `|o_cur − o_prev| / (o_cur + o_prev)` is below
/// `distance_threshold`. The score is `‖o_cur·n_cur − o_prev·n_prev‖`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetNormal {
    pub dot_threshold: f64,
    pub distance_threshold: f64,
}

impl Default for OffsetNormal {
    fn default() -> Self {
        Self {
            dot_threshold: 0.5,
            distance_threshold: 2.0,
        }
    }
}

impl OffsetNormal {
    pub fn new(dot_threshold: f64, distance_threshold: f64) -> Self {
        Self {
            dot_threshold,
            distance_threshold,
        }
    }
}

impl PlaneMetric for OffsetNormal {
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        let n_cur = cur.normal();
        let n_prev = prev.normal();
        let f_constraint = n_cur.dot(n_prev);
        if !(f_constraint > self.dot_threshold) {
            return None;
        }

        let o_cur = cur.points().first()?.dot(n_cur).abs();
        let o_prev = prev.points().first()?.dot(n_cur).abs();
        let total = o_cur + o_prev;
        // Both planes pass through the origin along n_cur: identical offsets.
        let relative = if total <= EPS {
            0.0
        } else {
            (o_cur - o_prev).abs() / total
        };
        if !(relative < self.distance_threshold) {
            return None;
        }

        Some((n_cur * o_cur - n_prev * o_prev).norm())
    }

    fn name(&self) -> &'static str {
        "offset_normal"
    }
}
