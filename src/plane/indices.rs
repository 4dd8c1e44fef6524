//! Point-index sets and the Jaccard overlap between them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Set of point identifiers into the originating point cloud.
///
/// Hashed so that intersection walks only the smaller operand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointIndexSet {
    ids: HashSet<u32>,
}

impl PointIndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `true` if `id` was not present yet.
    pub fn insert(&mut self, id: u32) -> bool {
        self.ids.insert(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ids.iter().copied()
    }

    /// Identifiers in ascending order.
    pub fn to_sorted_vec(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// `|self ∩ other|`, O(min(|self|, |other|)).
    pub fn intersection_len(&self, other: &PointIndexSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.ids.iter().filter(|&id| large.ids.contains(id)).count()
    }

    /// `|self ∪ other|` derived from the intersection size.
    pub fn union_len(&self, other: &PointIndexSet) -> usize {
        self.len() + other.len() - self.intersection_len(other)
    }
}

impl FromIterator<u32> for PointIndexSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a u32> for PointIndexSet {
    fn from_iter<I: IntoIterator<Item = &'a u32>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

/// Jaccard index `|S ∩ T| / |S ∪ T|` in `[0, 1]`.
///
/// Two empty sets have no meaningful overlap; this returns 0 for them.
pub fn jaccard_index(a: &PointIndexSet, b: &PointIndexSet) -> f64 {
    let inter = a.intersection_len(b);
    let union = a.len() + b.len() - inter;
    if union == 0 {
        return 0.0;
    }
    inter as f64 / union as f64
}
