//! Scoring associations against annotation tags and timing them.
//!
//! A current plane is counted as correct when it is matched to a previous
//! plane with the same tag, or left unmatched while no previous plane carries
//! its tag. Point accuracy weighs the same decision by plane size.

use crate::assoc::{associate, associate_max_conflict, Association};
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::metrics::{JaccardThresholded, OverlapSimilarity, PlaneMetric};
use crate::plane::Plane;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;

/// Correctness counts for one frame pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameQuality {
    pub planes_total: usize,
    pub planes_correct: usize,
    pub points_total: usize,
    pub points_correct: usize,
}

impl FrameQuality {
    /// Fraction of correctly handled planes; `None` for an empty frame.
    pub fn plane_accuracy(&self) -> Option<f64> {
        ratio(self.planes_correct, self.planes_total)
    }

    /// Fraction of points belonging to correctly handled planes.
    pub fn point_accuracy(&self) -> Option<f64> {
        ratio(self.points_correct, self.points_total)
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}

pub fn evaluate_quality(
    current: &[Plane],
    previous: &[Plane],
    association: &Association,
) -> FrameQuality {
    let previous_tags: HashSet<_> = previous.iter().map(Plane::tag).collect();
    let mut quality = FrameQuality::default();
    for (idx, cur) in current.iter().enumerate() {
        quality.planes_total += 1;
        quality.points_total += cur.len();
        let correct = match association.get(idx) {
            Some(prev) => previous.get(prev).is_some_and(|p| p.tag() == cur.tag()),
            None => !previous_tags.contains(&cur.tag()),
        };
        if correct {
            quality.planes_correct += 1;
            quality.points_correct += cur.len();
        }
    }
    quality
}

/// Runs `f` `repeats` times (at least once) and returns the mean wall-clock
/// milliseconds per run.
pub fn time_association<F>(repeats: usize, mut f: F) -> f64
where
    F: FnMut() -> Association,
{
    let runs = repeats.max(1);
    let mut total = 0.0;
    for _ in 0..runs {
        let start = Instant::now();
        let association = f();
        total += elapsed_ms(start);
        std::hint::black_box(association);
    }
    total / runs as f64
}

/// A metric bound to the conflict-resolution policy it runs under.
pub enum AssociationMethod {
    SortedGreedy(Box<dyn PlaneMetric>),
    MaxConflict(JaccardThresholded),
}

impl AssociationMethod {
    pub fn run(&self, current: &[Plane], previous: &[Plane]) -> Association {
        match self {
            AssociationMethod::SortedGreedy(metric) => associate(current, previous, metric),
            AssociationMethod::MaxConflict(similarity) => {
                associate_max_conflict(current, previous, similarity)
            }
        }
    }

    /// `<algorithm>/<metric>` label used in reports.
    pub fn label(&self) -> String {
        match self {
            AssociationMethod::SortedGreedy(metric) => format!("sorted_greedy/{}", metric.name()),
            AssociationMethod::MaxConflict(similarity) => {
                format!("max_conflict/{}", OverlapSimilarity::name(similarity))
            }
        }
    }
}

impl std::fmt::Debug for AssociationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AssociationMethod").field(&self.label()).finish()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameQualityEntry {
    /// Index of the current frame; the previous frame is `frame - 1`.
    pub frame: usize,
    #[serde(flatten)]
    pub quality: FrameQuality,
    pub plane_accuracy: Option<f64>,
    pub point_accuracy: Option<f64>,
}

/// Per-frame quality of one method over a sequence.
#[derive(Clone, Debug, Serialize)]
pub struct MethodQuality {
    pub method: String,
    pub frames: Vec<FrameQualityEntry>,
    pub mean_plane_accuracy: Option<f64>,
    pub mean_point_accuracy: Option<f64>,
}

impl MethodQuality {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            frames: Vec::new(),
            mean_plane_accuracy: None,
            mean_point_accuracy: None,
        }
    }

    pub fn push(&mut self, frame: usize, quality: FrameQuality) {
        self.frames.push(FrameQualityEntry {
            frame,
            quality,
            plane_accuracy: quality.plane_accuracy(),
            point_accuracy: quality.point_accuracy(),
        });
        self.mean_plane_accuracy = mean(self.frames.iter().filter_map(|f| f.plane_accuracy));
        self.mean_point_accuracy = mean(self.frames.iter().filter_map(|f| f.point_accuracy));
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct QualityReport {
    pub frame_count: usize,
    pub methods: Vec<MethodQuality>,
}

/// Mean association time per sampled frame pair for one method.
#[derive(Clone, Debug, Serialize)]
pub struct MethodPerformance {
    pub method: String,
    pub timing: TimingBreakdown,
    pub mean_ms: Option<f64>,
}

impl MethodPerformance {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            timing: TimingBreakdown::default(),
            mean_ms: None,
        }
    }

    pub fn push(&mut self, frame: usize, mean_ms: f64) {
        self.timing.push(format!("frame {frame}"), mean_ms);
        self.mean_ms = self.timing.mean_ms();
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct PerformanceReport {
    pub repeats: usize,
    pub frame_step: usize,
    pub methods: Vec<MethodPerformance>,
}
