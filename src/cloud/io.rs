//! I/O helpers for depth frames, annotation images and JSON.
//!
//! - `load_depth_image`: read a 16-bit depth PNG into an owned buffer.
//! - `load_annotation_image`: read an RGB label image into per-pixel tags.
//! - `load_raw_depth`: read a whitespace-separated ray-distance text file.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::CameraIntrinsics;
use crate::plane::PlaneTag;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned row-major 16-bit depth buffer.
#[derive(Clone, Debug)]
pub struct DepthImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u16>,
}

impl DepthImage {
    /// Fails when the image size disagrees with the intrinsics.
    pub fn check_size(&self, intrinsics: &CameraIntrinsics) -> Result<(), String> {
        if self.width != intrinsics.width || self.height != intrinsics.height {
            return Err(format!(
                "depth image is {}x{}, intrinsics expect {}x{}",
                self.width, self.height, intrinsics.width, intrinsics.height
            ));
        }
        Ok(())
    }
}

/// Load a depth image from disk as 16-bit grayscale.
pub fn load_depth_image(path: &Path) -> Result<DepthImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(DepthImage {
        width,
        height,
        data: img.into_raw(),
    })
}

/// Load an RGB annotation image; every pixel becomes a tag, black is background.
pub fn load_annotation_image(path: &Path) -> Result<(usize, usize, Vec<PlaneTag>), String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let tags = img
        .pixels()
        .map(|px| PlaneTag::from_rgb(px[0], px[1], px[2]))
        .collect();
    Ok((width, height, tags))
}

/// Load the first `count` whitespace-separated values of a raw `.depth`
/// text file (ICL-NUIM). Trailing values are ignored.
pub fn load_raw_depth(path: &Path, count: usize) -> Result<Vec<f64>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let values = text
        .split_whitespace()
        .take(count)
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|e| format!("Bad depth value {tok:?} in {}: {e}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() < count {
        return Err(format!(
            "{} holds {} depth values, expected {count}",
            path.display(),
            values.len()
        ));
    }
    Ok(values)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir =
            std::env::temp_dir().join(format!("plane_assoc_io_{name}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn depth_png_round_trips_16_bit_values() {
        let dir = scratch_dir("depth");
        let path = dir.join("depth.png");
        let img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(3, 2, vec![0, 1000, 5000, 65535, 7, 42]).unwrap();
        img.save(&path).unwrap();

        let depth = load_depth_image(&path).unwrap();
        assert_eq!((depth.width, depth.height), (3, 2));
        assert_eq!(depth.data, vec![0, 1000, 5000, 65535, 7, 42]);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn annotation_pixels_become_tags() {
        let dir = scratch_dir("annot");
        let path = dir.join("labels.png");
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(2, 1, vec![0, 0, 0, 255, 0, 10]).unwrap();
        img.save(&path).unwrap();

        let (w, h, tags) = load_annotation_image(&path).unwrap();
        assert_eq!((w, h), (2, 1));
        assert_eq!(tags, vec![PlaneTag::BACKGROUND, PlaneTag::from_rgb(255, 0, 10)]);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn json_writer_creates_parent_dirs() {
        let dir = scratch_dir("json");
        let path = dir.join("nested").join("out.json");
        write_json_file(&path, &vec![1, 2, 3]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let back: Vec<i32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn raw_depth_text_is_parsed_up_to_count() {
        let dir = scratch_dir("raw");
        let path = dir.join("scene_00_0001.depth");
        fs::write(&path, "1.5 2.25\n3e2 4 99 ").unwrap();
        assert_eq!(load_raw_depth(&path, 4).unwrap(), vec![1.5, 2.25, 300.0, 4.0]);

        let err = load_raw_depth(&path, 6).unwrap_err();
        assert!(err.contains("5 depth values"));
        fs::write(&path, "1.0 x 2.0").unwrap();
        assert!(load_raw_depth(&path, 3).unwrap_err().contains("\"x\""));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_depth_image(Path::new("/nonexistent/depth.png")).unwrap_err();
        assert!(err.contains("/nonexistent/depth.png"));
    }
}
