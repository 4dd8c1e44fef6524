//! Plane equation in Hessian normal form and its eigen-based estimation.

use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use serde::{Deserialize, Serialize};

const EPS: f64 = 1e-12;
/// Relative eigenvalue floor below which a point set is considered rank-deficient.
const DEGENERATE_RATIO: f64 = 1e-10;

/// Plane `a·x + b·y + c·z + d = 0` with a unit normal `(a, b, c)` and `d ≥ 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneEquation {
    normal: Vector3<f64>,
    offset: f64,
}

impl PlaneEquation {
    /// Builds a canonical equation from raw coefficients.
    ///
    /// The normal is scaled to unit length (scaling `d` with it) and the sign
    /// is flipped when needed so that `d ≥ 0`. Returns `None` for a zero or
    /// non-finite normal.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Option<Self> {
        let normal = Vector3::new(a, b, c);
        let norm = normal.norm();
        if !norm.is_finite() || norm <= EPS || !d.is_finite() {
            return None;
        }
        Some(Self::canonical(normal / norm, d / norm))
    }

    fn canonical(normal: Vector3<f64>, offset: f64) -> Self {
        if offset < 0.0 {
            Self {
                normal: -normal,
                offset: -offset,
            }
        } else {
            Self { normal, offset }
        }
    }

    /// Unit normal `(a, b, c)`.
    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Non-negative offset `d`.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Coefficients as `[a, b, c, d]`.
    pub fn coefficients(&self) -> [f64; 4] {
        [self.normal[0], self.normal[1], self.normal[2], self.offset]
    }

    /// Signed distance of `p` to the plane.
    #[inline]
    pub fn signed_distance(&self, p: &Vector3<f64>) -> f64 {
        self.normal.dot(p) + self.offset
    }
}

/// Reasons a point set cannot be turned into a plane equation.
#[derive(Clone, Debug, PartialEq)]
pub enum FitError {
    TooFewPoints { found: usize },
    NonFinite,
    Degenerate,
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::TooFewPoints { found } => {
                write!(f, "too few points for a plane fit ({found} < 3)")
            }
            FitError::NonFinite => write!(f, "point set contains non-finite coordinates"),
            FitError::Degenerate => write!(f, "point set is collinear or coincident"),
        }
    }
}

impl std::error::Error for FitError {}

/// Fits a plane through `points` by principal-axis decomposition.
///
/// The normal is the eigenvector of the scatter matrix `AᵀA` (points minus
/// centroid) with the smallest eigenvalue. The offset is `-(n · c)` and the
/// equation is sign-normalized so that `d ≥ 0`.
///
/// Near-spherical inputs with a repeated smallest eigenvalue are not detected;
/// the resulting normal is then an arbitrary direction of the degenerate
/// eigenspace.
pub fn fit_plane(points: &[Vector3<f64>]) -> Result<PlaneEquation, FitError> {
    if points.len() < 3 {
        return Err(FitError::TooFewPoints {
            found: points.len(),
        });
    }

    let mut centroid = Vector3::zeros();
    for p in points {
        if !(p[0].is_finite() && p[1].is_finite() && p[2].is_finite()) {
            return Err(FitError::NonFinite);
        }
        centroid += p;
    }
    centroid /= points.len() as f64;

    let mut scatter = Matrix3::zeros();
    for p in points {
        let centered = p - centroid;
        scatter += centered * centered.transpose();
    }

    let eigen = SymmetricEigen::new(scatter);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let lambda_mid = eigen.eigenvalues[order[1]];
    let lambda_max = eigen.eigenvalues[order[2]];
    if !lambda_max.is_finite() || lambda_max <= EPS {
        return Err(FitError::Degenerate);
    }
    // Collinear sets have two vanishing eigenvalues.
    if lambda_mid <= DEGENERATE_RATIO * lambda_max {
        return Err(FitError::Degenerate);
    }

    let normal: Vector3<f64> = eigen.eigenvectors.column(order[0]).into_owned();
    let norm = normal.norm();
    if !norm.is_finite() || norm <= EPS {
        return Err(FitError::Degenerate);
    }
    let normal = normal / norm;
    let offset = -normal.dot(&centroid);
    Ok(PlaneEquation::canonical(normal, offset))
}
