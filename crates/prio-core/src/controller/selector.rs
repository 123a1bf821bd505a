use prio_model::Rank;
use tracing::{debug, warn};

use crate::{
    context::RaceContext, controller::TaskReport, error::RaceError, rankset::RankedMultiset,
};

/// Decision of the selector after one report.
#[derive(Debug)]
pub(crate) enum Verdict<T> {
    /// No unresolved task can outrank this result.
    Winner(T),
    /// Keep consuming reports.
    Pending,
}

/// Best success seen so far that could not be proven optimal yet.
struct Champion<T> {
    rank: Rank,
    result: T,
}

/// State of the decision loop.
///
/// Owned by the single consumer of the report channel; nothing else touches the rank set
/// or the champion, so no locking is involved.
///
/// Invariant: every report arriving here belongs to a task whose rank is still in `ranks`,
/// so the set is never empty when peeked.
pub(crate) struct Selector<T> {
    ranks: Box<dyn RankedMultiset>,
    champion: Option<Champion<T>>,
}

impl<T> Selector<T> {
    /// Take ownership of the seeded rank set and sort it once.
    pub(crate) fn new(mut ranks: Box<dyn RankedMultiset>) -> Self {
        ranks.sort();
        Self {
            ranks,
            champion: None,
        }
    }

    /// Apply the selection policy to one report.
    pub(crate) fn observe(&mut self, report: TaskReport<T>) -> Result<Verdict<T>, RaceError> {
        let TaskReport {
            task,
            rank,
            outcome,
        } = report;

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                debug!(%task, rank, error = %e, "task failed; rank retired");
                self.ranks.remove(rank);
                return Ok(Verdict::Pending);
            }
        };

        let Some(top) = self.ranks.peek_max() else {
            warn!(%task, rank, "success reported while no rank is in contention");
            return Err(RaceError::Invariant(format!(
                "rank set empty when task '{task}' (rank {rank}) reported"
            )));
        };
        if rank == top {
            debug!(%task, rank, "top rank succeeded");
            return Ok(Verdict::Winner(result));
        }

        match &self.champion {
            None => {
                // The rank stays tracked: an equal rank reported later is compared against it.
                debug!(%task, rank, top, "first champion");
                self.champion = Some(Champion { rank, result });
            }
            Some(current) if rank > current.rank => {
                debug!(%task, rank, replaced = current.rank, top, "champion replaced");
                self.ranks.remove(current.rank);
                self.champion = Some(Champion { rank, result });
            }
            Some(current) => {
                debug!(%task, rank, champion = current.rank, "result discarded; champion holds");
                self.ranks.remove(rank);
            }
        }
        Ok(Verdict::Pending)
    }

    /// Resolve the race once every activity has settled.
    ///
    /// A champion is returned even when `ctx` is done: an acquired answer beats reporting
    /// the cancellation.
    pub(crate) fn settle(self, ctx: &RaceContext) -> Result<T, RaceError> {
        if let Some(champion) = self.champion {
            debug!(rank = champion.rank, "settled on champion");
            return Ok(champion.result);
        }
        Err(ctx.err().unwrap_or(RaceError::NoResult))
    }

    /// Rank of the current champion.
    pub(crate) fn champion_rank(&self) -> Option<Rank> {
        self.champion.as_ref().map(|c| c.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rankset::{RankSlice, RankTree};
    use crate::task::TaskError;

    fn seeded(ranks: &[Rank]) -> Selector<&'static str> {
        let mut set = RankSlice::new();
        for &r in ranks {
            set.add(r);
        }
        Selector::new(Box::new(set))
    }

    fn ok(rank: Rank, v: &'static str) -> TaskReport<&'static str> {
        TaskReport {
            task: v.to_string(),
            rank,
            outcome: Ok(v),
        }
    }

    fn err(rank: Rank) -> TaskReport<&'static str> {
        TaskReport {
            task: format!("err-{rank}"),
            rank,
            outcome: Err(TaskError::fail("boom")),
        }
    }

    #[test]
    fn top_rank_wins_immediately() {
        let mut sel = seeded(&[1, 2]);
        assert!(matches!(sel.observe(ok(2, "B")), Ok(Verdict::Winner("B"))));
    }

    #[test]
    fn lower_rank_becomes_champion_and_is_returned_on_settle() {
        let mut sel = seeded(&[1, 2]);
        assert!(matches!(sel.observe(ok(1, "A")), Ok(Verdict::Pending)));
        assert_eq!(sel.champion_rank(), Some(1));

        assert!(matches!(sel.settle(&RaceContext::new()), Ok("A")));
    }

    #[test]
    fn error_on_top_rank_promotes_next_rank() {
        let mut sel = seeded(&[3, 2, 1]);
        assert!(matches!(sel.observe(err(3)), Ok(Verdict::Pending)));
        assert!(matches!(sel.observe(ok(2, "B")), Ok(Verdict::Winner("B"))));
    }

    #[test]
    fn higher_champion_retires_previous_rank() {
        let mut sel = seeded(&[4, 2, 1]);
        sel.observe(ok(1, "A")).unwrap();
        sel.observe(ok(2, "B")).unwrap();
        assert_eq!(sel.champion_rank(), Some(2));

        // Rank 1 is gone: once 4 fails, 2 is the top and the champion is final.
        sel.observe(err(4)).unwrap();
        assert!(matches!(sel.settle(&RaceContext::new()), Ok("B")));
    }

    #[test]
    fn equal_rank_does_not_replace_champion() {
        let mut sel = seeded(&[4, 1, 1]);
        sel.observe(ok(1, "A")).unwrap();
        sel.observe(ok(1, "E")).unwrap();
        assert_eq!(sel.champion_rank(), Some(1));

        let ctx = RaceContext::new();
        ctx.cancel();
        assert!(matches!(sel.settle(&ctx), Ok("A")));
    }

    #[test]
    fn intermediate_errors_are_skipped() {
        let mut sel = seeded(&[5, 4, 3, 2]);
        sel.observe(ok(2, "B")).unwrap();
        sel.observe(err(5)).unwrap();
        sel.observe(err(4)).unwrap();
        assert!(matches!(sel.observe(ok(3, "C")), Ok(Verdict::Winner("C"))));
    }

    #[test]
    fn settle_without_champion_prefers_context_error() {
        let sel = seeded(&[1]);
        let ctx = RaceContext::new();
        ctx.cancel();
        assert!(matches!(sel.settle(&ctx), Err(RaceError::Canceled)));

        let mut sel = seeded(&[1]);
        sel.observe(err(1)).unwrap();
        assert!(matches!(
            sel.settle(&RaceContext::new()),
            Err(RaceError::NoResult)
        ));
    }

    #[test]
    fn empty_rank_set_is_reported_as_invariant_violation() {
        let mut sel: Selector<&'static str> = Selector::new(Box::new(RankTree::new()));
        assert!(matches!(
            sel.observe(ok(1, "ghost")),
            Err(RaceError::Invariant(_))
        ));
    }
}
