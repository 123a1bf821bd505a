use std::fmt;

use prio_model::Rank;

use crate::{metrics::ReportOutcome, task::TaskError};

/// Outcome of one task, tagged with the rank it was registered with.
pub struct TaskReport<T> {
    /// Task name, for diagnostics.
    pub task: String,
    pub rank: Rank,
    pub outcome: Result<T, TaskError>,
}

impl<T> TaskReport<T> {
    /// Metrics classification of this report.
    pub fn kind(&self) -> ReportOutcome {
        match &self.outcome {
            Ok(_) => ReportOutcome::Success,
            Err(TaskError::Panicked { .. }) => ReportOutcome::Panicked,
            Err(_) => ReportOutcome::Failure,
        }
    }
}

impl<T> fmt::Debug for TaskReport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskReport")
            .field("task", &self.task)
            .field("rank", &self.rank)
            .field("ok", &self.outcome.is_ok())
            .finish()
    }
}
