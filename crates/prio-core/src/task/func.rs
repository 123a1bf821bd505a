use std::{borrow::Cow, fmt, future::Future, sync::Arc};

use async_trait::async_trait;
use prio_model::Rank;

use crate::{
    context::RaceContext,
    task::{RankedTask, TaskError, TaskRef},
};

/// Closure-backed [`RankedTask`].
///
/// ```rust
/// use prio_core::{RaceContext, RankedTask, TaskFn, TaskRef};
///
/// let task: TaskRef<&'static str> =
///     TaskFn::arc("cache", 1, |_ctx: RaceContext| async move { Ok("hit") });
/// assert_eq!(task.rank(), 1);
/// assert_eq!(task.name(), "cache");
/// ```
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    rank: Rank,
    f: F,
}

impl<F> TaskFn<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, rank: Rank, f: F) -> Self {
        Self {
            name: name.into(),
            rank,
            f,
        }
    }

    /// Build the task and wrap it into a [`TaskRef`].
    pub fn arc<T, Fut>(name: impl Into<Cow<'static, str>>, rank: Rank, f: F) -> TaskRef<T>
    where
        F: Fn(RaceContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
        T: Send + 'static,
    {
        Arc::new(Self::new(name, rank, f))
    }
}

impl<F> fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFn")
            .field("name", &self.name)
            .field("rank", &self.rank)
            .finish()
    }
}

#[async_trait]
impl<T, F, Fut> RankedTask<T> for TaskFn<F>
where
    F: Fn(RaceContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    async fn perform(&self, ctx: RaceContext) -> Result<T, TaskError> {
        (self.f)(ctx).await
    }
}
