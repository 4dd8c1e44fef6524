//! Depth/annotation image sequences on disk.
//!
//! A sequence is a pair of directories holding one depth file and one RGB
//! annotation PNG per frame. Depth is a 16-bit PNG, or a raw ray-distance
//! text file for [`DatasetFormat::IclRaw`]. File order follows the dataset's
//! naming scheme.

use crate::cloud::io::{load_annotation_image, load_depth_image, load_raw_depth};
use crate::cloud::{extract_planes, CameraIntrinsics, DownSample, PointCloud};
use crate::plane::Frame;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File naming scheme of a dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    /// Timestamp file names; lexicographic order.
    #[default]
    Tum,
    /// Integer file stems (`12.png`); numeric order.
    Icl,
    /// Raw ICL-NUIM renders: `scene_00_0012.depth` text files holding the
    /// distance along each pixel ray, ordered by the last `_` field.
    IclRaw,
}

impl DatasetFormat {
    /// Extension of the depth files, without the dot.
    pub fn depth_extension(&self) -> &'static str {
        match self {
            DatasetFormat::Tum | DatasetFormat::Icl => "png",
            DatasetFormat::IclRaw => "depth",
        }
    }

    fn frame_number(&self, name: &str) -> Option<u64> {
        let stem = Path::new(name).file_stem()?.to_str()?;
        match self {
            DatasetFormat::Tum => None,
            DatasetFormat::Icl => stem.parse().ok(),
            DatasetFormat::IclRaw => stem.rsplit('_').next()?.parse().ok(),
        }
    }

    /// Sorts file names in frame order.
    pub fn sort(&self, names: &mut [String]) {
        match self {
            DatasetFormat::Tum => names.sort(),
            DatasetFormat::Icl | DatasetFormat::IclRaw => names.sort_by(|a, b| {
                let ka = self.frame_number(a);
                let kb = self.frame_number(b);
                // Unparsable names go last, in lexicographic order.
                match (ka, kb) {
                    (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.cmp(b),
                }
            }),
        }
    }
}

fn list_files(dir: &Path, format: DatasetFormat, extension: &str) -> Result<Vec<String>, String> {
    let suffix = format!(".{extension}");
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to read dir {}: {e}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read dir {}: {e}", dir.display()))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.to_ascii_lowercase().ends_with(&suffix) {
                names.push(name.to_string());
            }
        }
    }
    format.sort(&mut names);
    Ok(names)
}

/// Ordered frames of one recording.
#[derive(Clone, Debug)]
pub struct Sequence {
    depth_dir: PathBuf,
    annotation_dir: PathBuf,
    depth_images: Vec<String>,
    annotation_images: Vec<String>,
    format: DatasetFormat,
    intrinsics: CameraIntrinsics,
    depth_scale: f64,
}

impl Sequence {
    pub fn open(
        depth_dir: &Path,
        annotation_dir: &Path,
        format: DatasetFormat,
        intrinsics: CameraIntrinsics,
        depth_scale: f64,
    ) -> Result<Self, String> {
        let depth_images = list_files(depth_dir, format, format.depth_extension())?;
        let annotation_images = list_files(annotation_dir, format, "png")?;
        if depth_images.len() != annotation_images.len() {
            return Err(format!(
                "{} depth images but {} annotation images",
                depth_images.len(),
                annotation_images.len()
            ));
        }
        debug!(
            "Sequence::open: {} frames from {}",
            depth_images.len(),
            depth_dir.display()
        );
        Ok(Self {
            depth_dir: depth_dir.to_path_buf(),
            annotation_dir: annotation_dir.to_path_buf(),
            depth_images,
            annotation_images,
            format,
            intrinsics,
            depth_scale,
        })
    }

    pub fn len(&self) -> usize {
        self.depth_images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth_images.is_empty()
    }

    /// Labeled point cloud of frame `index`.
    pub fn cloud_for_frame(&self, index: usize) -> Result<PointCloud, String> {
        let depth_name = self
            .depth_images
            .get(index)
            .ok_or_else(|| format!("frame {index} out of range ({} frames)", self.len()))?;
        let depth_path = self.depth_dir.join(depth_name);
        let k = &self.intrinsics;
        let mut cloud = match self.format {
            DatasetFormat::Tum | DatasetFormat::Icl => {
                let depth = load_depth_image(&depth_path)?;
                depth.check_size(k)?;
                PointCloud::from_depth(&depth.data, k, self.depth_scale)?
            }
            DatasetFormat::IclRaw => {
                let distances = load_raw_depth(&depth_path, k.width * k.height)?;
                PointCloud::from_ray_distances(&distances, k, self.depth_scale)?
            }
        };

        let annot_path = self.annotation_dir.join(&self.annotation_images[index]);
        let (w, h, tags) = load_annotation_image(&annot_path)?;
        if (w, h) != (self.intrinsics.width, self.intrinsics.height) {
            return Err(format!(
                "annotation {} is {w}x{h}, expected {}x{}",
                annot_path.display(),
                self.intrinsics.width,
                self.intrinsics.height
            ));
        }
        cloud.annotate(tags)?;
        Ok(cloud)
    }

    /// Planes of frame `index` after down-sampling.
    pub fn planes_for_frame(
        &self,
        index: usize,
        down_sample: &DownSample,
        min_points: usize,
    ) -> Result<Frame, String> {
        let cloud = self.cloud_for_frame(index)?;
        let cloud = down_sample.apply(&cloud);
        Ok(extract_planes(&cloud, min_points))
    }
}
