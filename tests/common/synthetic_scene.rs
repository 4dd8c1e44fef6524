//! Ray-cast depth and label images of a simple room.
//!
//! The camera looks down +z with y pointing to the floor. The room has a back
//! wall, a floor and a left wall; each frame moves the camera forward.

use image::{ImageBuffer, Luma, Rgb};
use plane_assoc::cloud::CameraIntrinsics;
use std::path::{Path, PathBuf};

pub const DEPTH_SCALE: f64 = 5000.0;

pub const BACK_WALL: [u8; 3] = [255, 0, 0];
pub const FLOOR: [u8; 3] = [0, 255, 0];
pub const LEFT_WALL: [u8; 3] = [0, 0, 255];

pub fn intrinsics() -> CameraIntrinsics {
    CameraIntrinsics {
        width: 64,
        height: 48,
        fx: 50.0,
        fy: 50.0,
        cx: 31.5,
        cy: 23.5,
    }
}

/// Depth (raw units) and RGB label of every pixel with the camera advanced
/// by `forward` along z.
pub fn render(k: &CameraIntrinsics, forward: f64) -> (Vec<u16>, Vec<[u8; 3]>) {
    let back_z = 3.0 - forward;
    let floor_y = 1.0;
    let left_x = -1.5;

    let mut depth = Vec::with_capacity(k.width * k.height);
    let mut labels = Vec::with_capacity(k.width * k.height);
    for v in 0..k.height {
        for u in 0..k.width {
            let dx = (u as f64 - k.cx) / k.fx;
            let dy = (v as f64 - k.cy) / k.fy;
            let mut best = (back_z, BACK_WALL);
            if dy > 0.0 && floor_y / dy < best.0 {
                best = (floor_y / dy, FLOOR);
            }
            if dx < 0.0 && left_x / dx < best.0 {
                best = (left_x / dx, LEFT_WALL);
            }
            depth.push((best.0 * DEPTH_SCALE).round() as u16);
            labels.push(best.1);
        }
    }
    (depth, labels)
}

/// Writes `frames` depth/label PNG pairs named `0.png`, `1.png`, … and
/// returns the depth and annotation directories.
pub fn write_sequence(root: &Path, frames: usize, step: f64) -> (PathBuf, PathBuf) {
    let k = intrinsics();
    let depth_dir = root.join("depth");
    let annot_dir = root.join("labels");
    std::fs::create_dir_all(&depth_dir).unwrap();
    std::fs::create_dir_all(&annot_dir).unwrap();
    for i in 0..frames {
        let (depth, labels) = render(&k, i as f64 * step);
        let depth_img: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(k.width as u32, k.height as u32, depth).unwrap();
        depth_img.save(depth_dir.join(format!("{i}.png"))).unwrap();
        let rgb: Vec<u8> = labels.into_iter().flatten().collect();
        let label_img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(k.width as u32, k.height as u32, rgb).unwrap();
        label_img.save(annot_dir.join(format!("{i}.png"))).unwrap();
    }
    (depth_dir, annot_dir)
}

/// Like [`write_sequence`], but depth goes to raw ICL-style text files
/// (`scene_00_<i>.depth`) holding centimetres along each pixel ray.
pub fn write_raw_sequence(root: &Path, frames: usize, step: f64) -> (PathBuf, PathBuf) {
    let k = intrinsics();
    let (depth_dir, annot_dir) = write_sequence(root, frames, step);
    for i in 0..frames {
        std::fs::remove_file(depth_dir.join(format!("{i}.png"))).unwrap();
        std::fs::rename(
            annot_dir.join(format!("{i}.png")),
            annot_dir.join(format!("scene_00_{i:04}.png")),
        )
        .unwrap();
        let (depth, _) = render(&k, i as f64 * step);
        let mut text = String::new();
        for (idx, raw) in depth.iter().enumerate() {
            let dx = ((idx % k.width) as f64 - k.cx) / k.fx;
            let dy = ((idx / k.width) as f64 - k.cy) / k.fy;
            let z = *raw as f64 / DEPTH_SCALE;
            let cm = z * (dx * dx + dy * dy + 1.0).sqrt() * 100.0;
            text.push_str(&format!("{cm:.6} "));
        }
        std::fs::write(depth_dir.join(format!("scene_00_{i:04}.depth")), text).unwrap();
    }
    (depth_dir, annot_dir)
}

pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("plane_assoc_{name}_{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
