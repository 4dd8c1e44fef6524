//! Plane association between consecutive range-sensor frames.
//!
//! Planes are fitted once per frame from labelled point sets. Given the
//! planes of the previous and current frame, an association maps each current
//! plane to at most one previous plane so that no previous plane is used twice.
//!
//! ```
//! use plane_assoc::prelude::*;
//! use nalgebra::Vector3;
//!
//! let floor = |z: f64, ids: std::ops::Range<u32>, tag: u32| {
//!     let points = vec![
//!         Vector3::new(0.0, 0.0, z),
//!         Vector3::new(1.0, 0.0, z),
//!         Vector3::new(0.0, 1.0, z),
//!         Vector3::new(1.0, 1.0, z),
//!     ];
//!     Plane::new(points, ids.collect(), PlaneTag(tag)).unwrap()
//! };
//! let previous = vec![floor(1.0, 0..4, 1), floor(3.0, 10..14, 2)];
//! let current = vec![floor(1.02, 0..4, 1)];
//!
//! let association = associate(&current, &previous, &JaccardThresholded::default());
//! assert_eq!(association.get(0), Some(0));
//! ```

// Core model and association.
pub mod angle;
pub mod assoc;
pub mod metrics;
pub mod plane;

// Loading, experiments and reporting.
pub mod cloud;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod evaluation;

// --- High-level re-exports -------------------------------------------------

pub use crate::assoc::{
    associate, associate_max_conflict, Association, AssociationAlgorithm, Associator,
};
pub use crate::plane::{fit_plane, FitError, Frame, Plane, PlaneEquation, PlaneTag};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::metrics::{
        JaccardThresholded, JaccardWeighted, NormJaccard, OffsetNormal, OverlapSimilarity,
        PlaneMetric,
    };
    pub use crate::plane::PointIndexSet;
    pub use crate::{associate, associate_max_conflict, Association, Associator};
    pub use crate::{Frame, Plane, PlaneTag};
}
