//! Units of work raced by the controller.
//!
//! Implement [`RankedTask`] directly for stateful sources, or wrap a closure with [`TaskFn`].
mod error;
pub use error::TaskError;

mod func;
pub use func::TaskFn;

use std::sync::Arc;

use async_trait::async_trait;
use prio_model::Rank;

use crate::context::RaceContext;

/// Independent, rankable unit of work producing a `T`.
///
/// The controller reads [`rank`](RankedTask::rank) exactly once, at registration, and calls
/// [`perform`](RankedTask::perform) exactly once per race on its own tokio task.
#[async_trait]
pub trait RankedTask<T>: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "task"
    }

    /// Preference of this task's result. Higher wins.
    fn rank(&self) -> Rank;

    /// Do the work.
    ///
    /// `ctx` is done once the caller cancels, the deadline elapses, or the race has already
    /// been decided. Watching it is optional: results produced after that point are dropped.
    async fn perform(&self, ctx: RaceContext) -> Result<T, TaskError>;
}

/// Shared handle to a task. The caller keeps its own clones; the controller only references it.
pub type TaskRef<T> = Arc<dyn RankedTask<T>>;
