use thiserror::Error;

/// Failure of a single task.
///
/// Never surfaced to the caller of a race: it only takes the task's rank out of contention.
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("task failed: {reason}")]
    Fail { reason: String },

    #[error("task canceled")]
    Canceled,

    /// The task body panicked; the controller converts the panic into this error.
    #[error("task panicked: {reason}")]
    Panicked { reason: String },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    /// Return label value for logs and metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "fail",
            TaskError::Canceled => "canceled",
            TaskError::Panicked { .. } => "panicked",
        }
    }
}
