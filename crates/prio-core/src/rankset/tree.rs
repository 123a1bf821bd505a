use std::collections::BTreeMap;

use prio_model::Rank;

use super::RankedMultiset;

/// Rank set backed by an ordered map of rank to multiplicity.
///
/// Always ordered, so [`sort`](RankedMultiset::sort) is a no-op.
#[derive(Debug, Clone, Default)]
pub struct RankTree {
    counts: BTreeMap<Rank, usize>,
    len: usize,
}

impl RankTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries equal to `rank`.
    pub fn count(&self, rank: Rank) -> usize {
        self.counts.get(&rank).copied().unwrap_or(0)
    }
}

impl RankedMultiset for RankTree {
    fn add(&mut self, rank: Rank) {
        *self.counts.entry(rank).or_insert(0) += 1;
        self.len += 1;
    }

    #[inline]
    fn sort(&mut self) {}

    fn remove(&mut self, rank: Rank) {
        let Some(n) = self.counts.get_mut(&rank) else {
            return;
        };
        *n -= 1;
        if *n == 0 {
            self.counts.remove(&rank);
        }
        self.len -= 1;
    }

    fn peek_max(&self) -> Option<Rank> {
        self.counts.last_key_value().map(|(&rank, _)| rank)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}
