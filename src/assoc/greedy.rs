//! Sorted-greedy assignment over lower-is-better pair scores.

use super::Association;
use crate::metrics::PlaneMetric;
use crate::plane::Plane;
use log::debug;
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Admissible `(cur, prev)` pair with its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScoredPair {
    pub cur: usize,
    pub prev: usize,
    pub score: f64,
}

#[inline]
fn score_pair<M: PlaneMetric + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    metric: &M,
    cur: usize,
    prev: usize,
) -> Option<ScoredPair> {
    metric
        .score(&previous[prev], &current[cur])
        .filter(|s| !s.is_nan())
        .map(|score| ScoredPair { cur, prev, score })
}

/// Scores the full cross product, keeping admissible pairs in
/// `(cur, prev)` enumeration order.
#[cfg(feature = "parallel")]
pub(crate) fn score_pairs<M: PlaneMetric + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    metric: &M,
) -> Vec<ScoredPair> {
    let cols = previous.len();
    (0..current.len() * cols)
        .into_par_iter()
        .filter_map(|k| score_pair(current, previous, metric, k / cols, k % cols))
        .collect()
}

/// Scores the full cross product, keeping admissible pairs in
/// `(cur, prev)` enumeration order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn score_pairs<M: PlaneMetric + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    metric: &M,
) -> Vec<ScoredPair> {
    let mut pairs = Vec::new();
    for cur in 0..current.len() {
        for prev in 0..previous.len() {
            if let Some(pair) = score_pair(current, previous, metric, cur, prev) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// Resolves scored pairs into a conflict-free mapping.
///
/// Pairs are stably sorted ascending by score, so equal scores keep their
/// enumeration order. A pair is taken only if its current plane is still
/// unassigned and its previous plane is still free.
pub(crate) fn resolve(
    mut pairs: Vec<ScoredPair>,
    current_len: usize,
    previous_len: usize,
) -> Association {
    let admissible_pairs = pairs.len();
    pairs.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal));

    let mut matches: Vec<Option<usize>> = vec![None; current_len];
    let mut prev_used = vec![false; previous_len];
    for pair in &pairs {
        if matches[pair.cur].is_some() || prev_used[pair.prev] {
            continue;
        }
        matches[pair.cur] = Some(pair.prev);
        prev_used[pair.prev] = true;
    }

    Association::from_matches(matches, admissible_pairs)
}

/// Matches current-frame planes to previous-frame planes by greedily
/// consuming the lowest scores first.
///
/// Not a globally optimal assignment; deterministic and linear in the number
/// of admissible pairs after the sort.
pub fn associate<M: PlaneMetric + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    metric: &M,
) -> Association {
    let pairs = score_pairs(current, previous, metric);
    let association = resolve(pairs, current.len(), previous.len());
    debug!(
        "associate[{}]: cur={} prev={} admissible={} matched={}",
        metric.name(),
        current.len(),
        previous.len(),
        association.admissible_pairs(),
        association.matched_count()
    );
    association
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(cur: usize, prev: usize, score: f64) -> ScoredPair {
        ScoredPair { cur, prev, score }
    }

    #[test]
    fn lowest_score_claims_previous_plane_first() {
        let pairs = vec![pair(0, 0, 0.5), pair(1, 0, 0.1), pair(1, 1, 0.3), pair(0, 1, 0.6)];
        let assoc = resolve(pairs, 2, 2);
        assert_eq!(assoc.matches(), &[Some(1), Some(0)]);
    }

    #[test]
    fn greedy_is_not_globally_optimal() {
        // Optimal total would be 0.2 + 0.2; greedy takes 0.1 first.
        let pairs = vec![pair(0, 0, 0.1), pair(0, 1, 0.2), pair(1, 0, 0.2)];
        let assoc = resolve(pairs, 2, 2);
        assert_eq!(assoc.matches(), &[Some(0), None]);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let pairs = vec![pair(0, 0, 0.5), pair(1, 0, 0.5)];
        let assoc = resolve(pairs, 2, 1);
        assert_eq!(assoc.matches(), &[Some(0), None]);

        let pairs = vec![pair(1, 0, 0.5), pair(0, 0, 0.5)];
        let assoc = resolve(pairs, 2, 1);
        assert_eq!(assoc.matches(), &[None, Some(0)]);
    }

    #[test]
    fn unmatched_planes_map_to_none() {
        let assoc = resolve(Vec::new(), 3, 2);
        assert_eq!(assoc.matches(), &[None, None, None]);
        assert_eq!(assoc.admissible_pairs(), 0);
    }
}
