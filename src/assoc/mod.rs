//! Frame-to-frame plane association.
//!
//! Two conflict-resolution policies are provided and are not meant to be
//! mixed:
//! - [`associate`] (sorted-greedy): scores every `(cur, prev)` pair with a
//!   lower-is-better [`PlaneMetric`], sorts the admissible pairs and consumes
//!   them greedily. This is the default.
//! - [`associate_max_conflict`]: builds per-plane rows of a higher-is-better
//!   [`OverlapSimilarity`] and removes the weaker of two conflicting
//!   arg-max proposals until every proposal is unique.
//!
//! Both produce an [`Association`] that is injective on its matched values.
//! Pair scoring runs on rayon when the `parallel` feature is enabled; the
//! subsequent resolution is always sequential and deterministic.

mod greedy;
mod max_conflict;

pub use greedy::associate;
pub use max_conflict::associate_max_conflict;

use crate::metrics::{OverlapSimilarity, PlaneMetric};
use crate::plane::Plane;
use serde::{Deserialize, Serialize};

/// Result of associating one frame pair.
///
/// `matches[i]` is the index of the previous-frame plane matched to the
/// `i`-th current-frame plane, or `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Association {
    matches: Vec<Option<usize>>,
    admissible_pairs: usize,
}

impl Association {
    pub(crate) fn from_matches(matches: Vec<Option<usize>>, admissible_pairs: usize) -> Self {
        debug_assert!(is_injective(&matches));
        Self {
            matches,
            admissible_pairs,
        }
    }

    /// Match of the `cur`-th current plane, `None` if unmatched or out of range.
    #[inline]
    pub fn get(&self, cur: usize) -> Option<usize> {
        self.matches.get(cur).copied().flatten()
    }

    #[inline]
    pub fn matches(&self) -> &[Option<usize>] {
        &self.matches
    }

    /// Matched `(cur, prev)` index pairs in current-plane order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(cur, prev)| prev.map(|p| (cur, p)))
    }

    /// Number of current planes that received a match.
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_some()).count()
    }

    /// Number of admissible pairs the metric produced.
    #[inline]
    pub fn admissible_pairs(&self) -> usize {
        self.admissible_pairs
    }

    /// Number of current planes covered by the mapping.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// No previous plane is the target of two current planes.
    pub fn is_injective(&self) -> bool {
        is_injective(&self.matches)
    }
}

fn is_injective(matches: &[Option<usize>]) -> bool {
    let mut seen = std::collections::HashSet::new();
    matches.iter().flatten().all(|prev| seen.insert(*prev))
}

/// Conflict-resolution policy selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationAlgorithm {
    #[default]
    SortedGreedy,
    MaxConflict,
}

/// Borrowed pair of frames to associate.
#[derive(Clone, Copy, Debug)]
pub struct Associator<'a> {
    current: &'a [Plane],
    previous: &'a [Plane],
}

impl<'a> Associator<'a> {
    pub fn new(current: &'a [Plane], previous: &'a [Plane]) -> Self {
        Self { current, previous }
    }

    pub fn current(&self) -> &'a [Plane] {
        self.current
    }

    pub fn previous(&self) -> &'a [Plane] {
        self.previous
    }

    /// Sorted-greedy association with a lower-is-better metric.
    pub fn associate<M: PlaneMetric + ?Sized>(&self, metric: &M) -> Association {
        associate(self.current, self.previous, metric)
    }

    /// Max-conflict association with a higher-is-better similarity.
    pub fn associate_max_conflict<S: OverlapSimilarity + ?Sized>(
        &self,
        similarity: &S,
    ) -> Association {
        associate_max_conflict(self.current, self.previous, similarity)
    }
}
