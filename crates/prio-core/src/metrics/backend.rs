use std::sync::Arc;

use crate::error::RaceError;

/// How a single task report ended up, as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Task returned a result.
    Success,
    /// Task returned an error.
    Failure,
    /// Task body panicked.
    Panicked,
    /// Result was dropped because the race context was already done.
    Abandoned,
}

impl ReportOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            ReportOutcome::Success => "success",
            ReportOutcome::Failure => "failure",
            ReportOutcome::Panicked => "panicked",
            ReportOutcome::Abandoned => "abandoned",
        }
    }
}

/// How a race settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceOutcome {
    /// A report was proven optimal before every task settled.
    Optimal,
    /// The best champion was returned after all activity settled.
    Fallback,
    /// Every task failed.
    NoResult,
    /// Context cancelled and no champion.
    Canceled,
    /// Deadline elapsed and no champion.
    DeadlineExceeded,
    /// Internal invariant violated.
    Invariant,
}

impl RaceOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            RaceOutcome::Optimal => "optimal",
            RaceOutcome::Fallback => "fallback",
            RaceOutcome::NoResult => "no_result",
            RaceOutcome::Canceled => "canceled",
            RaceOutcome::DeadlineExceeded => "deadline_exceeded",
            RaceOutcome::Invariant => "invariant",
        }
    }

    /// Classify a race error.
    pub fn from_error(err: &RaceError) -> Self {
        match err {
            RaceError::NoResult => RaceOutcome::NoResult,
            RaceError::Canceled => RaceOutcome::Canceled,
            RaceError::DeadlineExceeded => RaceOutcome::DeadlineExceeded,
            RaceError::Invariant(_) | RaceError::Spec(_) => RaceOutcome::Invariant,
        }
    }
}

/// Backend metrics collection interface.
///
/// All methods are called from the race hot path and must not block.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record the start of a race.
    ///
    /// # Arguments
    /// - `tasks`: number of registered tasks
    fn record_race_started(&self, tasks: usize);
    /// Record a task report, or its abandonment.
    ///
    /// Called from task activities for `Abandoned`, from the decision loop otherwise.
    fn record_report(&self, outcome: ReportOutcome);
    /// Record how a race settled and how long it took.
    ///
    /// # Arguments
    /// - `outcome`: how the race settled
    /// - `duration_ms`: time from launch to decision in milliseconds
    fn record_race_finished(&self, outcome: RaceOutcome, duration_ms: u64);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
