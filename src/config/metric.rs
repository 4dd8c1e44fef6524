use crate::assoc::AssociationAlgorithm;
use crate::evaluation::AssociationMethod;
use crate::metrics::{
    JaccardThresholded, JaccardWeighted, NormJaccard, OffsetNormal, PlaneMetric,
};
use serde::{Deserialize, Serialize};

/// One metric entry of an experiment config, selected by `kind`.
///
/// ```json
/// { "kind": "jaccard_thresholded", "limit_angle_deg": 10.0, "limit_distance": 0.1 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricConfig {
    JaccardThresholded {
        #[serde(default = "default_limit_angle_deg")]
        limit_angle_deg: f64,
        #[serde(default = "default_limit_distance")]
        limit_distance: f64,
    },
    JaccardWeighted {
        #[serde(default = "default_angle_weight")]
        angle_weight: f64,
        #[serde(default = "default_jaccard_weight")]
        jaccard_weight: f64,
    },
    OffsetNormal {
        #[serde(default = "default_dot_threshold")]
        dot_threshold: f64,
        #[serde(default = "default_distance_threshold")]
        distance_threshold: f64,
    },
    NormJaccard,
}

fn default_limit_angle_deg() -> f64 {
    10.0
}
fn default_limit_distance() -> f64 {
    0.1
}
fn default_angle_weight() -> f64 {
    5.0
}
fn default_jaccard_weight() -> f64 {
    2.0
}
fn default_dot_threshold() -> f64 {
    0.5
}
fn default_distance_threshold() -> f64 {
    2.0
}

impl MetricConfig {
    /// The metrics compared by default: thresholded Jaccard, offset-normal
    /// and normalized-equation Jaccard.
    pub fn default_set() -> Vec<MetricConfig> {
        vec![
            MetricConfig::JaccardThresholded {
                limit_angle_deg: default_limit_angle_deg(),
                limit_distance: default_limit_distance(),
            },
            MetricConfig::OffsetNormal {
                dot_threshold: default_dot_threshold(),
                distance_threshold: default_distance_threshold(),
            },
            MetricConfig::NormJaccard,
        ]
    }

    pub fn build(&self) -> Box<dyn PlaneMetric> {
        match *self {
            MetricConfig::JaccardThresholded {
                limit_angle_deg,
                limit_distance,
            } => Box::new(JaccardThresholded::new(
                limit_angle_deg.to_radians(),
                limit_distance,
            )),
            MetricConfig::JaccardWeighted {
                angle_weight,
                jaccard_weight,
            } => Box::new(JaccardWeighted::new(angle_weight, jaccard_weight)),
            MetricConfig::OffsetNormal {
                dot_threshold,
                distance_threshold,
            } => Box::new(OffsetNormal::new(dot_threshold, distance_threshold)),
            MetricConfig::NormJaccard => Box::new(NormJaccard),
        }
    }

    /// Binds the metric to a conflict-resolution policy. Max-conflict needs a
    /// higher-is-better similarity, which only the thresholded Jaccard metric
    /// provides.
    pub fn method(&self, algorithm: AssociationAlgorithm) -> Result<AssociationMethod, String> {
        match (algorithm, self) {
            (AssociationAlgorithm::SortedGreedy, _) => {
                Ok(AssociationMethod::SortedGreedy(self.build()))
            }
            (
                AssociationAlgorithm::MaxConflict,
                MetricConfig::JaccardThresholded {
                    limit_angle_deg,
                    limit_distance,
                },
            ) => Ok(AssociationMethod::MaxConflict(JaccardThresholded::new(
                limit_angle_deg.to_radians(),
                *limit_distance,
            ))),
            (AssociationAlgorithm::MaxConflict, other) => Err(format!(
                "max_conflict requires the jaccard_thresholded metric, got {}",
                other.build().name()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_entries_with_defaults() {
        let json = r#"[
            {"kind": "jaccard_thresholded", "limit_angle_deg": 20.0},
            {"kind": "offset_normal"},
            {"kind": "norm_jaccard"}
        ]"#;
        let metrics: Vec<MetricConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(
            metrics[0],
            MetricConfig::JaccardThresholded {
                limit_angle_deg: 20.0,
                limit_distance: 0.1
            }
        );
        assert_eq!(metrics[1..], MetricConfig::default_set()[1..]);
    }

    #[test]
    fn builds_named_metrics() {
        let names: Vec<_> = MetricConfig::default_set()
            .iter()
            .map(|m| m.build().name())
            .collect();
        assert_eq!(names, ["jaccard_thresholded", "offset_normal", "norm_jaccard"]);
    }

    #[test]
    fn max_conflict_accepts_only_thresholded_jaccard() {
        let thresholded = &MetricConfig::default_set()[0];
        let method = thresholded.method(AssociationAlgorithm::MaxConflict).unwrap();
        assert_eq!(method.label(), "max_conflict/jaccard_thresholded");

        let err = MetricConfig::NormJaccard
            .method(AssociationAlgorithm::MaxConflict)
            .unwrap_err();
        assert!(err.contains("norm_jaccard"));

        let method = MetricConfig::NormJaccard
            .method(AssociationAlgorithm::SortedGreedy)
            .unwrap();
        assert_eq!(method.label(), "sorted_greedy/norm_jaccard");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let res: Result<MetricConfig, _> = serde_json::from_str(r#"{"kind": "euclid"}"#);
        assert!(res.is_err());
    }
}
