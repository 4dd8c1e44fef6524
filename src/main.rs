use nalgebra::Vector3;
use plane_assoc::config::MetricConfig;
use plane_assoc::evaluation::evaluate_quality;
use plane_assoc::plane::PointIndexSet;
use plane_assoc::{AssociationAlgorithm, FitError, Plane, PlaneTag};

/// Samples an `n × n` patch spanned by `u` and `v` around `origin`. Point ids
/// start at `first_id`.
fn patch(
    origin: Vector3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    n: u32,
    first_id: u32,
    tag: u32,
) -> Result<Plane, FitError> {
    let mut points = Vec::new();
    let mut ids = PointIndexSet::new();
    for i in 0..n {
        for j in 0..n {
            let s = i as f64 / n as f64;
            let t = j as f64 / n as f64;
            points.push(origin + u * s + v * t);
            ids.insert(first_id + i * n + j);
        }
    }
    Plane::new(points, ids, PlaneTag(tag))
}

/// Floor, back wall and side wall of a room, seen from a camera shifted by
/// `shift` along x. Ids move with the shift the way pixel indices would.
fn room(shift: f64, id_offset: u32) -> Result<Vec<Plane>, FitError> {
    let x = Vector3::x();
    let y = Vector3::y();
    let z = Vector3::z();
    let o = Vector3::new(-shift, 0.0, 0.0);
    Ok(vec![
        patch(o + Vector3::new(-1.0, -1.0, 2.0), x * 2.0, z * 2.0, 20, id_offset, 1)?,
        patch(o + Vector3::new(-1.0, -1.0, 4.0), x * 2.0, y * 2.0, 20, 1000 + id_offset, 2)?,
        patch(o + Vector3::new(1.0, -1.0, 2.0), y * 2.0, z * 2.0, 20, 2000 + id_offset, 3)?,
    ])
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let previous = room(0.0, 0).map_err(|e| e.to_string())?;
    let current = room(0.02, 20).map_err(|e| e.to_string())?;

    for metric in MetricConfig::default_set() {
        let method = metric.method(AssociationAlgorithm::SortedGreedy)?;
        let association = method.run(&current, &previous);
        let quality = evaluate_quality(&current, &previous, &association);
        println!(
            "{:<36} matches={:?} plane_accuracy={:.2}",
            method.label(),
            association.matches(),
            quality.plane_accuracy().unwrap_or(0.0)
        );
    }
    Ok(())
}
