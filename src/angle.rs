//! Angle utilities for comparing plane normals.

use nalgebra::Vector3;

const EPS: f64 = 1e-12;

/// Cosine of the angle between two 3D vectors, clamped to [-1, 1].
///
/// Inputs need not be unit length; degenerate vectors are treated as having
/// a tiny positive norm so the result stays finite.
#[inline]
pub fn cos_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let na = a.norm().max(EPS);
    let nb = b.norm().max(EPS);
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cos_between_ignores_magnitude() {
        let a = Vector3::new(0.0, 0.0, 3.0);
        let b = Vector3::new(0.0, 2.0, 2.0);
        assert!(approx_eq(cos_between(&a, &b), FRAC_PI_4.cos()));
    }

    #[test]
    fn antiparallel_and_orthogonal() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert!(approx_eq(cos_between(&x, &-x), -1.0));
        assert!(approx_eq(cos_between(&x, &y), 0.0));
    }

    #[test]
    fn zero_vector_stays_finite() {
        let z = Vector3::zeros();
        let x = Vector3::new(1.0, 0.0, 0.0);
        assert!(cos_between(&z, &x).is_finite());
    }
}
