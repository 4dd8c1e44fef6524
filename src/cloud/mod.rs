//! Labeled point clouds and plane extraction.
//!
//! - [`PointCloud::from_depth`]: pinhole back-projection of a depth image.
//! - [`PointCloud::annotate`]: attach one [`PlaneTag`] per point.
//! - [`PointCloud::uniform_down_sample`] / [`PointCloud::voxel_down_sample`]:
//!   thinning before extraction.
//! - [`extract_planes`]: group labeled points and fit one [`Plane`] per label.
//!
//! Point identifiers are positions in the cloud as it is handed to
//! [`extract_planes`], so they stay comparable between frames only when both
//! frames went through the same resolution and the same thinning.

pub mod io;

use crate::plane::{Frame, Plane, PlaneTag, PointIndexSet};
use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Pinhole camera parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub width: usize,
    pub height: usize,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

/// Point positions with per-point validity and labels.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    points: Vec<Vector3<f64>>,
    valid: Vec<bool>,
    labels: Vec<PlaneTag>,
}

impl PointCloud {
    /// Cloud of valid, unlabeled points.
    pub fn from_points(points: Vec<Vector3<f64>>) -> Self {
        let n = points.len();
        Self {
            points,
            valid: vec![true; n],
            labels: vec![PlaneTag::BACKGROUND; n],
        }
    }

    /// Back-projects a row-major depth image.
    ///
    /// `z = depth / depth_scale`, `x = (u − cx)·z / fx`, `y = (v − cy)·z / fy`.
    /// Every pixel produces a point at index `v·width + u`; zero-depth pixels
    /// are kept but marked invalid.
    pub fn from_depth(
        depth: &[u16],
        intrinsics: &CameraIntrinsics,
        depth_scale: f64,
    ) -> Result<Self, String> {
        check_samples(depth.len(), intrinsics, depth_scale)?;
        Ok(Self::back_project(intrinsics, |idx, _, _| {
            let raw = depth[idx];
            (raw != 0).then(|| raw as f64 / depth_scale)
        }))
    }

    /// Back-projects distances measured along each pixel ray (ICL-NUIM raw
    /// `.depth` files) rather than along the optical axis.
    ///
    /// `z = dist / sqrt(x_mod² + y_mod² + 1) / depth_scale`. Non-positive or
    /// non-finite distances are kept but marked invalid.
    pub fn from_ray_distances(
        distances: &[f64],
        intrinsics: &CameraIntrinsics,
        depth_scale: f64,
    ) -> Result<Self, String> {
        check_samples(distances.len(), intrinsics, depth_scale)?;
        Ok(Self::back_project(intrinsics, |idx, x_mod, y_mod| {
            let dist = distances[idx];
            (dist.is_finite() && dist > 0.0)
                .then(|| dist / (x_mod * x_mod + y_mod * y_mod + 1.0).sqrt() / depth_scale)
        }))
    }

    /// Builds a full-frame cloud; `depth_at(idx, x_mod, y_mod)` yields `z` or
    /// `None` for an invalid pixel.
    fn back_project<F>(intrinsics: &CameraIntrinsics, depth_at: F) -> Self
    where
        F: Fn(usize, f64, f64) -> Option<f64>,
    {
        let expected = intrinsics.width * intrinsics.height;
        let mut points = Vec::with_capacity(expected);
        let mut valid = Vec::with_capacity(expected);
        for v in 0..intrinsics.height {
            let y_mod = (v as f64 - intrinsics.cy) / intrinsics.fy;
            for u in 0..intrinsics.width {
                let x_mod = (u as f64 - intrinsics.cx) / intrinsics.fx;
                let z = depth_at(v * intrinsics.width + u, x_mod, y_mod);
                let zv = z.unwrap_or(0.0);
                points.push(Vector3::new(x_mod * zv, y_mod * zv, zv));
                valid.push(z.is_some());
            }
        }
        Self {
            points,
            valid,
            labels: vec![PlaneTag::BACKGROUND; expected],
        }
    }

    /// Replaces the per-point labels.
    pub fn annotate(&mut self, labels: Vec<PlaneTag>) -> Result<(), String> {
        if labels.len() != self.points.len() {
            return Err(format!(
                "annotation has {} labels for {} points",
                labels.len(),
                self.points.len()
            ));
        }
        self.labels = labels;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    #[inline]
    pub fn labels(&self) -> &[PlaneTag] {
        &self.labels
    }

    /// Whether point `idx` carries a measurement; `false` out of range.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        self.valid.get(idx).copied().unwrap_or(false)
    }

    /// Keeps points `[0, k, 2k, …]`. A rate of 0 or 1 returns a copy.
    pub fn uniform_down_sample(&self, sample_rate: usize) -> PointCloud {
        let step = sample_rate.max(1);
        let keep: Vec<usize> = (0..self.len()).step_by(step).collect();
        PointCloud {
            points: keep.iter().map(|&i| self.points[i]).collect(),
            valid: keep.iter().map(|&i| self.valid[i]).collect(),
            labels: keep.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Replaces valid points by voxel centroids.
    ///
    /// The grid is anchored at the minimum bound of the valid points. Each
    /// voxel takes the most frequent label of its members (ties go to the
    /// smaller tag). Invalid points are dropped. Voxels are emitted in
    /// ascending grid-key order. A non-positive size returns a copy.
    pub fn voxel_down_sample(&self, voxel_size: f64) -> PointCloud {
        if !(voxel_size > 0.0) {
            return self.clone();
        }
        let Some(min_bound) = self.min_bound() else {
            return PointCloud::default();
        };

        #[derive(Default)]
        struct Voxel {
            sum: Vector3<f64>,
            count: usize,
            votes: HashMap<PlaneTag, usize>,
        }

        let mut voxels: BTreeMap<[i64; 3], Voxel> = BTreeMap::new();
        for (idx, p) in self.points.iter().enumerate() {
            if !self.valid[idx] {
                continue;
            }
            let rel = (p - min_bound) / voxel_size;
            let key = [
                rel[0].floor() as i64,
                rel[1].floor() as i64,
                rel[2].floor() as i64,
            ];
            let voxel = voxels.entry(key).or_default();
            voxel.sum += p;
            voxel.count += 1;
            *voxel.votes.entry(self.labels[idx]).or_insert(0) += 1;
        }

        let mut out = PointCloud::default();
        for voxel in voxels.into_values() {
            let label = voxel
                .votes
                .iter()
                .max_by(|(ta, ca), (tb, cb)| ca.cmp(cb).then_with(|| tb.cmp(ta)))
                .map(|(tag, _)| *tag)
                .unwrap_or(PlaneTag::BACKGROUND);
            out.points.push(voxel.sum / voxel.count as f64);
            out.valid.push(true);
            out.labels.push(label);
        }
        debug!(
            "voxel_down_sample: {} -> {} points (size={voxel_size})",
            self.len(),
            out.len()
        );
        out
    }

    fn min_bound(&self) -> Option<Vector3<f64>> {
        self.points
            .iter()
            .zip(&self.valid)
            .filter(|(_, ok)| **ok)
            .map(|(p, _)| *p)
            .reduce(|a, b| a.inf(&b))
    }
}

fn check_samples(
    samples: usize,
    intrinsics: &CameraIntrinsics,
    depth_scale: f64,
) -> Result<(), String> {
    let expected = intrinsics.width * intrinsics.height;
    if samples != expected {
        return Err(format!(
            "depth buffer has {samples} samples, intrinsics expect {}x{}={expected}",
            intrinsics.width, intrinsics.height
        ));
    }
    if !(depth_scale > 0.0) {
        return Err(format!("depth scale must be positive, got {depth_scale}"));
    }
    Ok(())
}

/// Down-sampling applied to a cloud before plane extraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownSample {
    /// Voxel edge length; `0` disables voxel down-sampling.
    pub voxel_size: f64,
    /// Keep every `sample_rate`-th point after voxelization.
    pub sample_rate: usize,
}

impl Default for DownSample {
    fn default() -> Self {
        Self {
            voxel_size: 0.0,
            sample_rate: 1,
        }
    }
}

impl DownSample {
    pub fn apply(&self, cloud: &PointCloud) -> PointCloud {
        let voxelized;
        let source = if self.voxel_size > 0.0 {
            voxelized = cloud.voxel_down_sample(self.voxel_size);
            &voxelized
        } else {
            cloud
        };
        source.uniform_down_sample(self.sample_rate)
    }
}

/// Groups valid, labeled points by tag and fits one plane per group.
///
/// Planes come out in ascending tag order. Groups smaller than `min_points`
/// (never below 3) or with a degenerate fit are skipped.
pub fn extract_planes(cloud: &PointCloud, min_points: usize) -> Frame {
    debug_assert!(
        cloud.len() <= u32::MAX as usize,
        "point ids are stored as u32"
    );
    let min_points = min_points.max(3);
    let mut groups: BTreeMap<PlaneTag, Vec<usize>> = BTreeMap::new();
    for (idx, tag) in cloud.labels.iter().enumerate() {
        if tag.is_background() || !cloud.valid[idx] {
            continue;
        }
        groups.entry(*tag).or_default().push(idx);
    }

    let mut planes = Vec::with_capacity(groups.len());
    for (tag, members) in groups {
        if members.len() < min_points {
            debug!(
                "extract_planes: skipping tag {:06x} with {} points",
                tag.0,
                members.len()
            );
            continue;
        }
        let points: Vec<Vector3<f64>> = members.iter().map(|&i| cloud.points[i]).collect();
        let indices: PointIndexSet = members.iter().map(|&i| i as u32).collect();
        match Plane::new(points, indices, tag) {
            Ok(plane) => planes.push(plane),
            Err(err) => warn!("extract_planes: tag {:06x} not fitted: {err}", tag.0),
        }
    }
    planes
}
