//! Pairwise plane metrics.
//!
//! Every [`PlaneMetric`] scores a `(prev, cur)` pair with the convention that
//! a lower score means more similar, and may reject a pair as not comparable
//! by returning `None`. The associator only sees the trait, so the variants
//! are interchangeable:
//! - [`JaccardThresholded`]: angle/offset gate, then `1 − Jaccard`.
//! - [`JaccardWeighted`]: weighted sum of angle, offset and overlap terms.
//! - [`OffsetNormal`]: distance between normal-scaled offsets.
//! - [`NormJaccard`]: equation distance plus `1 − Jaccard`.
//!
//! [`OverlapSimilarity`] is the opposite, higher-is-better convention and is
//! consumed only by the max-conflict associator. The two traits are kept
//! apart so a similarity can never be sorted as if it were a distance.

mod jaccard;
mod norm_jaccard;
mod offset_normal;

pub use jaccard::{JaccardThresholded, JaccardWeighted};
pub use norm_jaccard::NormJaccard;
pub use offset_normal::OffsetNormal;

use crate::angle::cos_between;
use crate::plane::Plane;

/// Lower-is-better pairwise score between a previous and a current plane.
pub trait PlaneMetric: Send + Sync {
    /// Score for the pair, or `None` when the pair is inadmissible.
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64>;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Higher-is-better pairwise similarity between a previous and a current plane.
pub trait OverlapSimilarity: Send + Sync {
    /// Similarity for the pair, or `None` when the pair is inadmissible.
    fn similarity(&self, prev: &Plane, cur: &Plane) -> Option<f64>;

    fn name(&self) -> &'static str;
}

impl<M: PlaneMetric + ?Sized> PlaneMetric for Box<M> {
    fn score(&self, prev: &Plane, cur: &Plane) -> Option<f64> {
        (**self).score(prev, cur)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Cosine between the two plane normals.
#[inline]
pub(crate) fn normal_cos(a: &Plane, b: &Plane) -> f64 {
    cos_between(a.normal(), b.normal())
}

/// Absolute difference of the two plane offsets.
#[inline]
pub(crate) fn offset_distance(a: &Plane, b: &Plane) -> f64 {
    (a.offset() - b.offset()).abs()
}
