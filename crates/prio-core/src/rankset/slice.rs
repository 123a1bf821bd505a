use prio_model::Rank;

use super::RankedMultiset;

/// Vector-backed rank set.
///
/// Removal and peek scan linearly; fine for the small task counts races usually have.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankSlice(Vec<Rank>);

impl RankSlice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in current order.
    #[inline]
    pub fn as_slice(&self) -> &[Rank] {
        &self.0
    }
}

impl From<Vec<Rank>> for RankSlice {
    fn from(v: Vec<Rank>) -> Self {
        Self(v)
    }
}

impl RankedMultiset for RankSlice {
    #[inline]
    fn add(&mut self, rank: Rank) {
        self.0.push(rank);
    }

    fn sort(&mut self) {
        self.0.sort_unstable_by(|a, b| b.cmp(a));
    }

    fn remove(&mut self, rank: Rank) {
        // `Vec::remove` shifts the tail, keeping survivors sorted.
        if let Some(idx) = self.0.iter().position(|&r| r == rank) {
            self.0.remove(idx);
        }
    }

    #[inline]
    fn peek_max(&self) -> Option<Rank> {
        self.0.first().copied()
    }

    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_existing_values() {
        let mut numbers = RankSlice::from(vec![1, 5, 3, 6, 2, 4]);

        numbers.remove(3);
        assert_eq!(numbers.as_slice(), &[1, 5, 6, 2, 4]);
        numbers.remove(1);
        assert_eq!(numbers.as_slice(), &[5, 6, 2, 4]);
        numbers.remove(4);
        assert_eq!(numbers.as_slice(), &[5, 6, 2]);
    }

    #[test]
    fn remove_missing_value_is_noop() {
        let mut numbers = RankSlice::from(vec![1, 5, 6, 2, 4]);
        numbers.remove(10);
        assert_eq!(numbers.as_slice(), &[1, 5, 6, 2, 4]);
    }

    #[test]
    fn remove_drops_a_single_duplicate() {
        let mut numbers = RankSlice::from(vec![3, 1, 3, 3]);
        numbers.remove(3);
        assert_eq!(numbers.as_slice(), &[1, 3, 3]);
    }

    #[test]
    fn sort_is_descending() {
        let mut numbers = RankSlice::from(vec![1, 5, 3, 6, 2, 4]);
        numbers.sort();
        assert_eq!(numbers.as_slice(), &[6, 5, 4, 3, 2, 1]);
        assert_eq!(numbers.peek_max(), Some(6));
    }

    #[test]
    fn sort_keeps_negative_ranks_below_zero() {
        let mut numbers = RankSlice::from(vec![-2, 0, i64::MIN, 7]);
        numbers.sort();
        assert_eq!(numbers.as_slice(), &[7, 0, -2, i64::MIN]);
    }

    #[test]
    fn peek_on_empty_is_none() {
        assert_eq!(RankSlice::new().peek_max(), None);
    }
}
