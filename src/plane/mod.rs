//! Planar patch model.
//!
//! A [`Plane`] bundles the points of one detected patch, the identifiers of
//! those points in the originating cloud, the fitted [`PlaneEquation`] and an
//! opaque [`PlaneTag`]. Planes are immutable once built; derived variants are
//! new values.

mod equation;
mod indices;

pub use equation::{fit_plane, FitError, PlaneEquation};
pub use indices::{jaccard_index, PointIndexSet};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Opaque identity attached to a plane (typically a packed label colour).
///
/// Only equality is meaningful; the associator never looks at it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlaneTag(pub u32);

impl PlaneTag {
    /// Unlabeled points (black in annotation images).
    pub const BACKGROUND: PlaneTag = PlaneTag(0);

    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        PlaneTag(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub fn is_background(&self) -> bool {
        *self == Self::BACKGROUND
    }
}

/// One planar patch observed in a frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plane {
    points: Vec<Vector3<f64>>,
    point_indices: PointIndexSet,
    equation: PlaneEquation,
    tag: PlaneTag,
}

impl Plane {
    /// Fits the equation to `points` and builds the plane.
    pub fn new(
        points: Vec<Vector3<f64>>,
        point_indices: PointIndexSet,
        tag: PlaneTag,
    ) -> Result<Self, FitError> {
        let equation = fit_plane(&points)?;
        Ok(Self {
            points,
            point_indices,
            equation,
            tag,
        })
    }

    /// Builds a plane around an already known equation.
    pub fn with_equation(
        points: Vec<Vector3<f64>>,
        point_indices: PointIndexSet,
        equation: PlaneEquation,
        tag: PlaneTag,
    ) -> Self {
        Self {
            points,
            point_indices,
            equation,
            tag,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    #[inline]
    pub fn point_indices(&self) -> &PointIndexSet {
        &self.point_indices
    }

    #[inline]
    pub fn equation(&self) -> &PlaneEquation {
        &self.equation
    }

    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        self.equation.normal()
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.equation.offset()
    }

    #[inline]
    pub fn tag(&self) -> PlaneTag {
        self.tag
    }

    /// Number of member points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Planes detected at one time step.
pub type Frame = Vec<Plane>;

/// Plane with a given equation whose single point is the foot of the origin.
#[cfg(test)]
pub(crate) fn synthetic_plane(coefficients: [f64; 4], ids: &[u32], tag: u32) -> Plane {
    let [a, b, c, d] = coefficients;
    let equation = PlaneEquation::new(a, b, c, d).expect("valid test equation");
    let foot = equation.normal() * -equation.offset();
    Plane::with_equation(vec![foot], ids.iter().collect(), equation, PlaneTag(tag))
}
