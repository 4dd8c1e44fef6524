//! Iterative max-conflict elimination over higher-is-better similarities.
//!
//! Each current plane proposes its arg-max previous plane. While two current
//! planes propose the same previous plane, the weaker proposal is struck
//! from its row and proposals are recomputed. Every round removes one
//! candidate edge, so the loop ends after at most `P·Q` rounds.

use super::Association;
use crate::metrics::OverlapSimilarity;
use crate::plane::Plane;
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type SimilarityRow = Vec<Option<f64>>;

fn similarity_row<S: OverlapSimilarity + ?Sized>(
    cur: &Plane,
    previous: &[Plane],
    similarity: &S,
) -> SimilarityRow {
    previous
        .iter()
        .map(|prev| similarity.similarity(prev, cur).filter(|s| !s.is_nan()))
        .collect()
}

#[cfg(feature = "parallel")]
fn similarity_rows<S: OverlapSimilarity + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    similarity: &S,
) -> Vec<SimilarityRow> {
    current
        .par_iter()
        .map(|cur| similarity_row(cur, previous, similarity))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn similarity_rows<S: OverlapSimilarity + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    similarity: &S,
) -> Vec<SimilarityRow> {
    current
        .iter()
        .map(|cur| similarity_row(cur, previous, similarity))
        .collect()
}

/// First index holding the maximum value, skipping struck entries.
fn row_argmax(row: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in row.iter().enumerate() {
        if let Some(v) = *value {
            match best {
                Some((_, b)) if v <= b => {}
                _ => best = Some((idx, v)),
            }
        }
    }
    best.map(|(idx, _)| idx)
}

/// The first two current planes proposing the lowest-indexed previous
/// plane that is proposed more than once.
fn first_conflict(proposals: &[Option<usize>], previous_len: usize) -> Option<(usize, usize)> {
    let mut counts = vec![0usize; previous_len];
    for prev in proposals.iter().flatten() {
        counts[*prev] += 1;
    }
    let contested = counts.iter().position(|&c| c > 1)?;
    let mut holders = proposals
        .iter()
        .enumerate()
        .filter(|(_, p)| **p == Some(contested))
        .map(|(cur, _)| cur);
    let first = holders.next()?;
    let second = holders.next()?;
    Some((first, second))
}

pub(crate) fn resolve(mut rows: Vec<SimilarityRow>, previous_len: usize) -> Association {
    let admissible_pairs = rows.iter().flatten().filter(|s| s.is_some()).count();
    let mut rounds = 0usize;
    loop {
        let proposals: Vec<Option<usize>> = rows.iter().map(|row| row_argmax(row)).collect();
        let Some((first, second)) = first_conflict(&proposals, previous_len) else {
            debug!("max-conflict: resolved after {rounds} eliminations");
            return Association::from_matches(proposals, admissible_pairs);
        };
        let best_first = proposals[first].and_then(|p| rows[first][p]);
        let best_second = proposals[second].and_then(|p| rows[second][p]);
        // Equal best scores strike the earlier plane's proposal.
        let loser = if best_first > best_second { second } else { first };
        if let Some(p) = proposals[loser] {
            rows[loser][p] = None;
        }
        rounds += 1;
    }
}

/// Matches current-frame planes to previous-frame planes by iterative
/// conflict elimination on a similarity where higher is better.
pub fn associate_max_conflict<S: OverlapSimilarity + ?Sized>(
    current: &[Plane],
    previous: &[Plane],
    similarity: &S,
) -> Association {
    let rows = similarity_rows(current, previous, similarity);
    let association = resolve(rows, previous.len());
    debug!(
        "associate_max_conflict[{}]: cur={} prev={} admissible={} matched={}",
        similarity.name(),
        current.len(),
        previous.len(),
        association.admissible_pairs(),
        association.matched_count()
    );
    association
}
