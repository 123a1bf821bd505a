use std::{fmt, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use prio_model::RaceSpec;

use crate::error::RaceError;

/// Cancellation and deadline carried into a race.
///
/// The context is created and owned by the caller. The controller derives a child from it,
/// so cancelling the caller's context reaches every task, while the race cancelling its own
/// child (when it returns early) never leaks back to the caller.
///
/// Cancellation is advisory: tasks receive the context and may watch it, but the controller
/// only uses it to decide whether a finished result is still forwarded.
#[derive(Clone, Default)]
pub struct RaceContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RaceContext {
    /// Context that is never done unless cancelled explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Build a context honouring the deadline of a [`RaceSpec`], if any.
    pub fn from_spec(spec: &RaceSpec) -> Self {
        match spec.timeout_ms {
            Some(ms) => Self::new().with_timeout(Duration::from_millis(ms)),
            None => Self::new(),
        }
    }

    /// Set a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline. An earlier existing deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a context cancelled together with this one, sharing its deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Underlying cancellation token.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Reason the context is done, `None` while it is still live.
    ///
    /// An elapsed deadline takes precedence over explicit cancellation.
    pub fn err(&self) -> Option<RaceError> {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(RaceError::DeadlineExceeded);
        }
        if self.token.is_cancelled() {
            return Some(RaceError::Canceled);
        }
        None
    }

    /// Resolves once the context is cancelled or its deadline elapses.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

impl fmt::Debug for RaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaceContext")
            .field("cancelled", &self.token.is_cancelled())
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl fmt::Display for RaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.err() {
            Some(e) => write!(f, "RaceContext(done: {e})"),
            None => f.write_str("RaceContext(live)"),
        }
    }
}
