//! Race controller: launches every task concurrently and selects the best successful result.
//!
//! Flow of a race:
//! 1. Every task runs on its own tokio task; its body is detached and never force-stopped.
//! 2. A per-task activity races the body against the context and forwards a [`TaskReport`].
//! 3. A supervisor waits for all activities and closes the report channel.
//! 4. The caller's task consumes reports in arrival order and decides
//!    (see [`Selector`](selector::Selector)).
mod report;
pub use report::TaskReport;

mod selector;
use selector::{Selector, Verdict};

use std::{fmt, marker::PhantomData};

use tokio::{sync::mpsc, task::JoinSet, time::Instant};
use tracing::{debug, info, instrument, trace, warn};

use prio_model::{Rank, RaceSpec};

use crate::{
    context::RaceContext,
    error::RaceError,
    metrics::{MetricsHandle, RaceOutcome, ReportOutcome, noop_metrics},
    rankset::{self, RankSlice, RankedMultiset},
    task::{TaskError, TaskRef},
};

/// Task registered for a race, with its rank captured at registration.
struct Entry<T> {
    rank: Rank,
    task: TaskRef<T>,
}

/// Runs ranked tasks concurrently and returns the best successful result.
///
/// Built once, filled with [`add_task`](RaceController::add_task), raced once with
/// [`run`](RaceController::run). `run` consumes the controller.
pub struct RaceController<T> {
    entries: Vec<Entry<T>>,
    ranks: Box<dyn RankedMultiset>,
    metrics: MetricsHandle,
}

impl<T: Send + 'static> RaceController<T> {
    /// Controller with the default [`RankSlice`] and no metrics.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RaceControllerBuilder<T> {
        RaceControllerBuilder::default()
    }

    /// Controller using the rank container selected by `spec`.
    ///
    /// The timeout in `spec` is applied by the context, see [`RaceContext::from_spec`].
    pub fn from_spec(spec: &RaceSpec) -> Result<Self, RaceError> {
        spec.validate()?;
        Ok(Self::builder()
            .with_rankset(rankset::from_kind(spec.rankset))
            .build())
    }

    /// Register a task. Its rank is read now and never again.
    pub fn add_task(&mut self, task: TaskRef<T>) {
        let rank = task.rank();
        trace!(task = task.name(), rank, "task registered");
        self.ranks.add(rank);
        self.entries.push(Entry { rank, task });
    }

    /// Number of registered tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Race every registered task.
    ///
    /// Returns as soon as the top remaining rank succeeds. Otherwise waits until every task
    /// has reported or been abandoned, then returns:
    /// - the best success (even if `ctx` is done by then);
    /// - the context error ([`RaceError::Canceled`] / [`RaceError::DeadlineExceeded`]);
    /// - [`RaceError::NoResult`] when every task failed.
    ///
    /// Task bodies still running when this returns keep running in the background; their
    /// context is cancelled and their results are dropped.
    #[instrument(level = "debug", skip_all, fields(tasks = self.entries.len()))]
    pub async fn run(self, ctx: RaceContext) -> Result<T, RaceError> {
        let Self {
            entries,
            ranks,
            metrics,
        } = self;

        let started = Instant::now();
        let total = entries.len();
        metrics.record_race_started(total);
        if total == 0 {
            warn!("race started without tasks");
        } else {
            info!(tasks = total, "race started");
        }

        // Cancelled when this function returns, releasing activities still waiting on bodies.
        let race_ctx = ctx.child();
        let _guard = race_ctx.token().clone().drop_guard();

        let (tx, mut rx) = mpsc::channel::<TaskReport<T>>(total.max(1));
        let mut activities = JoinSet::new();
        for entry in entries {
            activities.spawn(forward(
                entry,
                race_ctx.clone(),
                tx.clone(),
                metrics.clone(),
            ));
        }
        tokio::spawn(supervise(activities, tx));

        let mut selector = Selector::new(ranks);
        let decided = loop {
            let Some(report) = rx.recv().await else {
                debug!(champion = ?selector.champion_rank(), "report channel closed");
                break selector.settle(&ctx).map(|v| (v, RaceOutcome::Fallback));
            };
            metrics.record_report(report.kind());
            match selector.observe(report) {
                Ok(Verdict::Winner(v)) => break Ok((v, RaceOutcome::Optimal)),
                Ok(Verdict::Pending) => {}
                Err(e) => break Err(e),
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match decided {
            Ok((value, outcome)) => {
                info!(outcome = outcome.as_label(), elapsed_ms, "race decided");
                metrics.record_race_finished(outcome, elapsed_ms);
                Ok(value)
            }
            Err(e) => {
                let outcome = RaceOutcome::from_error(&e);
                info!(outcome = outcome.as_label(), error = %e, elapsed_ms, "race failed");
                metrics.record_race_finished(outcome, elapsed_ms);
                Err(e)
            }
        }
    }
}

/// Run one task body and hand its outcome to the decision loop, unless the race is done.
async fn forward<T: Send + 'static>(
    entry: Entry<T>,
    ctx: RaceContext,
    tx: mpsc::Sender<TaskReport<T>>,
    metrics: MetricsHandle,
) {
    let Entry { rank, task } = entry;
    let name = task.name().to_owned();

    // Detached: dropping the handle leaves the body running.
    let body = tokio::spawn({
        let ctx = ctx.clone();
        async move { task.perform(ctx).await }
    });

    let outcome = tokio::select! {
        biased;
        _ = ctx.done() => {
            trace!(task = %name, rank, "context done before task finished; abandoning");
            metrics.record_report(ReportOutcome::Abandoned);
            return;
        }
        joined = body => match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                warn!(task = %name, rank, error = %e, "task panicked");
                Err(TaskError::Panicked { reason: e.to_string() })
            }
            Err(_) => Err(TaskError::Canceled),
        },
    };

    let report = TaskReport {
        task: name.clone(),
        rank,
        outcome,
    };
    tokio::select! {
        biased;
        _ = ctx.done() => {
            trace!(task = %name, rank, "context done before report forwarded; abandoning");
            metrics.record_report(ReportOutcome::Abandoned);
        }
        sent = tx.send(report) => {
            if sent.is_err() {
                trace!(rank, "race already decided; report dropped");
            }
        }
    }
}

/// Wait for every activity, then drop the last sender so the decision loop sees the end.
async fn supervise<T>(mut activities: JoinSet<()>, tx: mpsc::Sender<TaskReport<T>>) {
    while let Some(joined) = activities.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "race activity terminated abnormally");
        }
    }
    drop(tx);
    debug!("all activities settled; report channel closed");
}

impl<T: Send + 'static> Default for RaceController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RaceController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaceController")
            .field("tasks", &self.entries.len())
            .field("ranks", &self.ranks.len())
            .field("metrics", &"<handle>")
            .finish()
    }
}

/// Builder for [`RaceController`].
pub struct RaceControllerBuilder<T> {
    ranks: Option<Box<dyn RankedMultiset>>,
    metrics: Option<MetricsHandle>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for RaceControllerBuilder<T> {
    fn default() -> Self {
        Self {
            ranks: None,
            metrics: None,
            _marker: PhantomData,
        }
    }
}

impl<T: Send + 'static> RaceControllerBuilder<T> {
    /// Use a custom rank container. It should be empty; its entries would join the race.
    pub fn with_rankset(mut self, ranks: Box<dyn RankedMultiset>) -> Self {
        self.ranks = Some(ranks);
        self
    }

    /// Inject a metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> RaceController<T> {
        RaceController {
            entries: Vec::new(),
            ranks: self
                .ranks
                .unwrap_or_else(|| Box::new(RankSlice::default())),
            metrics: self.metrics.unwrap_or_else(noop_metrics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsBackend;
    use crate::rankset::RankTree;
    use crate::task::RankedTask;

    use async_trait::async_trait;
    use prio_model::RankSetKind;
    use std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    struct MockTask {
        rank: Rank,
        delay: Duration,
        outcome: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl RankedTask<&'static str> for MockTask {
        fn name(&self) -> &str {
            "mock"
        }

        fn rank(&self) -> Rank {
            self.rank
        }

        async fn perform(&self, _ctx: RaceContext) -> Result<&'static str, TaskError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.outcome.map_err(TaskError::fail)
        }
    }

    fn ok(rank: Rank, v: &'static str, delay_ms: u64) -> TaskRef<&'static str> {
        Arc::new(MockTask {
            rank,
            delay: Duration::from_millis(delay_ms),
            outcome: Ok(v),
        })
    }

    fn fail(rank: Rank, delay_ms: u64) -> TaskRef<&'static str> {
        Arc::new(MockTask {
            rank,
            delay: Duration::from_millis(delay_ms),
            outcome: Err("boom"),
        })
    }

    fn controller(tasks: Vec<TaskRef<&'static str>>) -> RaceController<&'static str> {
        let mut c = RaceController::new();
        for t in tasks {
            c.add_task(t);
        }
        c
    }

    #[tokio::test(start_paused = true)]
    async fn highest_rank_wins_when_all_succeed() {
        let c = controller(vec![ok(1, "A", 0), ok(2, "B", 0)]);
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "B");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_top_rank_beats_faster_lower_ranks() {
        let c = controller(vec![
            ok(1, "A", 0),
            ok(2, "B", 5),
            fail(3, 0),
            ok(4, "D", 1_000),
            ok(1, "E", 3),
        ]);
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "D");
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_settles_on_first_champion() {
        let c = controller(vec![
            ok(1, "A", 0),
            ok(2, "B", 900_000),
            fail(3, 0),
            ok(4, "D", 1_000),
            ok(1, "E", 3),
        ]);
        let ctx = RaceContext::new().with_timeout(Duration::from_millis(5));

        let got = c.run(ctx.clone()).await;
        assert_eq!(got.unwrap(), "A");
        assert!(ctx.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn top_error_falls_back_to_best_survivor() {
        let c = controller(vec![
            fail(5, 0),
            fail(4, 2),
            ok(3, "C", 50),
            ok(2, "B", 0),
            ok(1, "A", 0),
        ]);
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "C");
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_is_returned_after_all_settle() {
        let c = controller(vec![fail(3, 10), ok(1, "A", 0), fail(2, 20)]);
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn all_errors_yield_no_result() {
        let c = controller(vec![fail(1, 0), fail(2, 5), fail(2, 1)]);
        assert!(matches!(
            c.run(RaceContext::new()).await,
            Err(RaceError::NoResult)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_race_yields_no_result() {
        let c: RaceController<&'static str> = RaceController::new();
        assert!(c.is_empty());
        assert!(matches!(
            c.run(RaceContext::new()).await,
            Err(RaceError::NoResult)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_without_champion_returns_deadline_error() {
        let c = controller(vec![ok(1, "A", 1_000), fail(2, 0)]);
        let ctx = RaceContext::new().with_timeout(Duration::from_millis(10));
        assert!(matches!(c.run(ctx).await, Err(RaceError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_without_champion_returns_canceled() {
        let c = controller(vec![ok(2, "B", 1_000), ok(1, "A", 1_000)]);
        let ctx = RaceContext::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        assert!(matches!(c.run(ctx).await, Err(RaceError::Canceled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_keeps_existing_champion() {
        let c = controller(vec![ok(2, "B", 3_600_000), ok(1, "A", 0)]);
        let ctx = RaceContext::new();

        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        assert_eq!(c.run(ctx).await.unwrap(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn returns_without_waiting_for_slow_lower_ranks() {
        let c = controller(vec![ok(10, "X", 0), ok(1, "Y", 3_600_000)]);

        let start = Instant::now();
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "X");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn caller_context_survives_early_exit() {
        let c = controller(vec![ok(2, "B", 0), ok(1, "A", 60_000)]);
        let ctx = RaceContext::new();

        assert_eq!(c.run(ctx.clone()).await.unwrap(), "B");
        assert!(!ctx.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_top_ranks_return_either() {
        let c = controller(vec![ok(3, "X", 0), ok(3, "Y", 0), ok(1, "Z", 0)]);
        let got = c.run(RaceContext::new()).await.unwrap();
        assert!(got == "X" || got == "Y", "unexpected winner {got}");
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_task_is_absorbed() {
        let mut c: RaceController<&'static str> = RaceController::new();
        c.add_task(crate::TaskFn::arc("panics", 2, |_ctx: RaceContext| async move {
            if true {
                panic!("task exploded");
            }
            Ok::<_, TaskError>("never")
        }));
        c.add_task(ok(1, "A", 5));

        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "A");
    }

    #[tokio::test(start_paused = true)]
    async fn tasks_observe_race_cancellation_after_decision() {
        let observed = Arc::new(AtomicUsize::new(0));
        let seen = observed.clone();

        let mut c: RaceController<&'static str> = RaceController::new();
        c.add_task(ok(2, "B", 0));
        c.add_task(crate::TaskFn::arc("watcher", 1, move |ctx: RaceContext| {
            let seen = seen.clone();
            async move {
                ctx.done().await;
                seen.fetch_add(1, Ordering::SeqCst);
                Err(TaskError::Canceled)
            }
        }));

        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "B");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tree_rankset_behaves_like_slice() {
        let mut c = RaceController::builder()
            .with_rankset(Box::new(RankTree::new()))
            .build();
        for t in [
            ok(1, "A", 0),
            ok(2, "B", 5),
            fail(3, 0),
            ok(4, "D", 1_000),
            ok(1, "E", 3),
        ] {
            c.add_task(t);
        }
        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "D");
    }

    #[tokio::test(start_paused = true)]
    async fn from_spec_builds_configured_controller() {
        let spec = RaceSpec::default()
            .with_rankset(RankSetKind::Tree)
            .with_timeout_ms(20);

        let mut c = RaceController::from_spec(&spec).unwrap();
        c.add_task(ok(2, "B", 1_000));
        c.add_task(ok(1, "A", 0));

        assert_eq!(c.run(RaceContext::from_spec(&spec)).await.unwrap(), "A");
    }

    #[test]
    fn from_spec_rejects_invalid_spec() {
        let spec = RaceSpec::default().with_timeout_ms(0);
        let res = RaceController::<()>::from_spec(&spec);
        assert!(matches!(res, Err(RaceError::Spec(_))));
    }

    #[derive(Default)]
    struct Recorder {
        started: AtomicUsize,
        reports: Mutex<Vec<ReportOutcome>>,
        finished: Mutex<Vec<RaceOutcome>>,
    }

    impl MetricsBackend for Recorder {
        fn record_race_started(&self, tasks: usize) {
            self.started.fetch_add(tasks, Ordering::SeqCst);
        }

        fn record_report(&self, outcome: ReportOutcome) {
            self.reports.lock().unwrap().push(outcome);
        }

        fn record_race_finished(&self, outcome: RaceOutcome, _duration_ms: u64) {
            self.finished.lock().unwrap().push(outcome);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn metrics_record_race_lifecycle() {
        let recorder = Arc::new(Recorder::default());

        let mut c = RaceController::builder()
            .with_metrics(recorder.clone())
            .build();
        c.add_task(fail(2, 0));
        c.add_task(ok(1, "A", 5));

        assert_eq!(c.run(RaceContext::new()).await.unwrap(), "A");

        assert_eq!(recorder.started.load(Ordering::SeqCst), 2);
        let reports = recorder.reports.lock().unwrap().clone();
        assert!(reports.contains(&ReportOutcome::Failure));
        assert!(reports.contains(&ReportOutcome::Success));
        assert_eq!(
            recorder.finished.lock().unwrap().as_slice(),
            &[RaceOutcome::Optimal]
        );
    }
}
