use thiserror::Error;

use prio_model::ModelError;

/// Outcome of a race that produced no usable result.
///
/// Individual task failures never show up here: they only retire a rank from contention.
#[derive(Debug, Error)]
pub enum RaceError {
    /// Every task settled and none of them succeeded.
    #[error("no result")]
    NoResult,

    /// The race context was cancelled before any success was recorded.
    #[error("race canceled")]
    Canceled,

    /// The race deadline elapsed before any success was recorded.
    #[error("race deadline exceeded")]
    DeadlineExceeded,

    /// Internal bookkeeping was violated (e.g. peeking an empty rank set).
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("invalid race spec: {0}")]
    Spec(#[from] ModelError),
}

impl RaceError {
    /// Returns `true` for errors originating from the race context.
    #[inline]
    pub fn is_context(&self) -> bool {
        matches!(self, RaceError::Canceled | RaceError::DeadlineExceeded)
    }
}
