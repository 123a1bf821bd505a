use serde::{Deserialize, Serialize};

use crate::{
    domain::TimeoutMs,
    error::{ModelError, ModelResult},
    strategy::RankSetKind,
};

/// Declarative settings for a single race.
///
/// `RaceSpec` does not describe the tasks themselves, those are registered in code.
/// It only covers how the race is tracked and how long the caller is willing to wait:
/// - `timeout_ms`: optional deadline for forwarding results, measured from context creation
/// - `rankset`: container used to track ranks still in contention
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RaceSpec {
    /// Deadline in milliseconds.
    ///
    /// Once it elapses, results that are not yet forwarded are discarded and the race
    /// settles with whatever champion it already holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<TimeoutMs>,
    /// Rank tracking container.
    pub rankset: RankSetKind,
}

impl RaceSpec {
    /// Attach a deadline in milliseconds.
    ///
    /// ```rust
    /// # use prio_model::{RaceSpec, RankSetKind};
    /// let spec = RaceSpec::default().with_timeout_ms(250);
    /// assert_eq!(spec.timeout_ms, Some(250));
    /// assert_eq!(spec.rankset, RankSetKind::Slice);
    /// ```
    pub fn with_timeout_ms(mut self, timeout_ms: TimeoutMs) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Select the rank tracking container.
    pub fn with_rankset(mut self, rankset: RankSetKind) -> Self {
        self.rankset = rankset;
        self
    }

    /// Rules:
    /// - `timeout_ms`, when set, is strictly positive.
    pub fn validate(&self) -> ModelResult<()> {
        if self.timeout_ms == Some(0) {
            return Err(ModelError::Invalid("timeoutMs must be greater than zero".into()));
        }
        Ok(())
    }
}
