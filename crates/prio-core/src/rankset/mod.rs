//! Containers tracking the ranks still in contention during a race.
//!
//! The controller only needs four operations, captured by [`RankedMultiset`].
//! [`RankSlice`] is the default; [`RankTree`] trades a little constant overhead for
//! logarithmic removal when many tasks race at once.
mod slice;
pub use slice::RankSlice;

mod tree;
pub use tree::RankTree;

use prio_model::{Rank, RankSetKind};

/// Ordered bag of ranks.
///
/// Duplicates are distinct entries. The controller calls [`sort`](RankedMultiset::sort) once
/// after every rank was added and before the first [`peek_max`](RankedMultiset::peek_max).
pub trait RankedMultiset: Send {
    /// Insert a rank. Order is not maintained until the next `sort`.
    fn add(&mut self, rank: Rank);

    /// Reorder entries so the maximum comes first.
    fn sort(&mut self);

    /// Remove one entry equal to `rank`. Absent values are ignored.
    fn remove(&mut self, rank: Rank);

    /// Largest remaining rank, `None` when the set is empty.
    fn peek_max(&self) -> Option<Rank>;

    /// Number of entries, duplicates included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the container selected by a [`RankSetKind`].
pub fn from_kind(kind: RankSetKind) -> Box<dyn RankedMultiset> {
    match kind {
        RankSetKind::Slice => Box::new(RankSlice::default()),
        RankSetKind::Tree => Box::new(RankTree::default()),
    }
}
