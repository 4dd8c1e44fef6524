use super::PlaneMetric;
use crate::plane::{jaccard_index, Plane};
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Euclidean distance between the two equations `(a, b, c, d)` plus
/// `1 − jaccard`. Always admissible.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct NormJaccard;

impl PlaneMetric for NormJaccard {
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        let eq_cur = Vector4::from(cur.equation().coefficients());
        let eq_prev = Vector4::from(prev.equation().coefficients());
        let jaccard = jaccard_index(cur.point_indices(), prev.point_indices());
        Some((eq_cur - eq_prev).norm() + 1.0 - jaccard)
    }

    fn name(&self) -> &'static str {
        "norm_jaccard"
    }
}
