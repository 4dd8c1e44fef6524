mod common;

use common::synthetic_scene::{
    intrinsics, render, scratch_dir, write_raw_sequence, write_sequence, BACK_WALL, DEPTH_SCALE,
    FLOOR, LEFT_WALL,
};
use plane_assoc::cloud::{extract_planes, DownSample, PointCloud};
use plane_assoc::config::MetricConfig;
use plane_assoc::dataset::{DatasetFormat, Sequence};
use plane_assoc::evaluation::evaluate_quality;
use plane_assoc::{AssociationAlgorithm, Frame, PlaneTag};

fn tag(rgb: [u8; 3]) -> PlaneTag {
    PlaneTag::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn frame_at(forward: f64) -> Frame {
    let k = intrinsics();
    let (depth, labels) = render(&k, forward);
    let mut cloud = PointCloud::from_depth(&depth, &k, DEPTH_SCALE).unwrap();
    cloud
        .annotate(labels.into_iter().map(tag).collect())
        .unwrap();
    extract_planes(&cloud, 3)
}

#[test]
fn rendered_room_yields_three_planes() {
    common::init_logging();
    let planes = frame_at(0.0);
    let tags: Vec<_> = planes.iter().map(|p| p.tag()).collect();
    assert_eq!(tags, vec![tag(LEFT_WALL), tag(FLOOR), tag(BACK_WALL)]);

    let back = &planes[2];
    assert!((back.offset() - 3.0).abs() < 1e-3, "offset={}", back.offset());
    assert!(back.normal().z.abs() > 0.999);
    let floor = &planes[1];
    assert!((floor.offset() - 1.0).abs() < 1e-3, "offset={}", floor.offset());
}

#[test]
fn every_default_metric_tracks_the_room() {
    common::init_logging();
    let previous = frame_at(0.0);
    let current = frame_at(0.02);

    let mut metrics = MetricConfig::default_set();
    metrics.push(MetricConfig::JaccardWeighted {
        angle_weight: 5.0,
        jaccard_weight: 2.0,
    });
    for metric in &metrics {
        let method = metric.method(AssociationAlgorithm::SortedGreedy).unwrap();
        let association = method.run(&current, &previous);
        assert!(association.is_injective());
        assert_eq!(
            association.matches(),
            &[Some(0), Some(1), Some(2)],
            "{}",
            method.label()
        );
        let quality = evaluate_quality(&current, &previous, &association);
        assert_eq!(quality.plane_accuracy(), Some(1.0), "{}", method.label());
        assert_eq!(quality.point_accuracy(), Some(1.0), "{}", method.label());
    }
}

#[test]
fn max_conflict_tracks_the_room() {
    let previous = frame_at(0.0);
    let current = frame_at(0.02);
    let method = MetricConfig::default_set()[0]
        .method(AssociationAlgorithm::MaxConflict)
        .unwrap();
    let association = method.run(&current, &previous);
    assert_eq!(association.matches(), &[Some(0), Some(1), Some(2)]);
}

#[test]
fn association_is_deterministic() {
    let previous = frame_at(0.0);
    let current = frame_at(0.04);
    let method = MetricConfig::NormJaccard
        .method(AssociationAlgorithm::SortedGreedy)
        .unwrap();
    let first = method.run(&current, &previous);
    for _ in 0..5 {
        assert_eq!(method.run(&current, &previous), first);
    }
}

#[test]
fn sequence_on_disk_round_trips_through_the_loader() {
    common::init_logging();
    let root = scratch_dir("sequence");
    let (depth_dir, annot_dir) = write_sequence(&root, 3, 0.02);

    let sequence =
        Sequence::open(&depth_dir, &annot_dir, DatasetFormat::Icl, intrinsics(), DEPTH_SCALE)
            .unwrap();
    assert_eq!(sequence.len(), 3);

    let plain = DownSample::default();
    let mut previous = sequence.planes_for_frame(0, &plain, 3).unwrap();
    assert_eq!(previous.len(), 3);
    let metric = MetricConfig::default_set()[0].build();
    for idx in 1..sequence.len() {
        let current = sequence.planes_for_frame(idx, &plain, 3).unwrap();
        let association = plane_assoc::associate(&current, &previous, &metric);
        let quality = evaluate_quality(&current, &previous, &association);
        assert_eq!(quality.plane_accuracy(), Some(1.0), "frame {idx}");
        previous = current;
    }

    let thinned = DownSample {
        voxel_size: 0.0,
        sample_rate: 4,
    };
    let planes = sequence.planes_for_frame(1, &thinned, 3).unwrap();
    assert_eq!(planes.len(), 3);
    let full = sequence.planes_for_frame(1, &plain, 3).unwrap();
    assert!(planes[2].len() < full[2].len());

    std::fs::remove_dir_all(root).ok();
}

#[test]
fn voxel_down_sampling_keeps_every_surface() {
    let k = intrinsics();
    let (depth, labels) = render(&k, 0.0);
    let mut cloud = PointCloud::from_depth(&depth, &k, DEPTH_SCALE).unwrap();
    cloud
        .annotate(labels.into_iter().map(tag).collect())
        .unwrap();
    let sampled = DownSample {
        voxel_size: 0.1,
        sample_rate: 1,
    }
    .apply(&cloud);
    assert!(sampled.len() < cloud.len());
    let planes = extract_planes(&sampled, 3);
    let tags: Vec<_> = planes.iter().map(|p| p.tag()).collect();
    assert_eq!(tags, vec![tag(LEFT_WALL), tag(FLOOR), tag(BACK_WALL)]);
}

#[test]
fn raw_ray_distance_sequence_matches_png_geometry() {
    common::init_logging();
    let root = scratch_dir("raw_sequence");
    let (depth_dir, annot_dir) = write_raw_sequence(&root, 2, 0.02);

    let sequence =
        Sequence::open(&depth_dir, &annot_dir, DatasetFormat::IclRaw, intrinsics(), 100.0)
            .unwrap();
    assert_eq!(sequence.len(), 2);

    let plain = DownSample::default();
    let previous = sequence.planes_for_frame(0, &plain, 3).unwrap();
    let current = sequence.planes_for_frame(1, &plain, 3).unwrap();
    let tags: Vec<_> = previous.iter().map(|p| p.tag()).collect();
    assert_eq!(tags, vec![tag(LEFT_WALL), tag(FLOOR), tag(BACK_WALL)]);
    assert!((previous[2].offset() - 3.0).abs() < 1e-3, "offset={}", previous[2].offset());
    assert!((current[2].offset() - 2.98).abs() < 1e-3, "offset={}", current[2].offset());

    let metric = MetricConfig::default_set()[0].build();
    let association = plane_assoc::associate(&current, &previous, &metric);
    assert_eq!(association.matches(), &[Some(0), Some(1), Some(2)]);

    std::fs::remove_dir_all(root).ok();
}
