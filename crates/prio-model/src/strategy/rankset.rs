use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{ModelError, ModelResult};

/// Selects the container used by the race controller to track ranks in contention.
///
/// Strategies:
/// - `Slice`: plain vector with linear removal and peek. Good enough for a handful of tasks.
/// - `Tree`: ordered map of rank to multiplicity. Logarithmic removal, preferable for large task counts.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankSetKind {
    /// Vector kept in descending order after the initial sort.
    #[default]
    Slice,
    /// Ordered map keyed by rank.
    Tree,
}

impl FromStr for RankSetKind {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slice" | "vec" | "array" | "" => Ok(RankSetKind::Slice),
            "tree" | "btree" => Ok(RankSetKind::Tree),
            other => Err(ModelError::UnknownRankSet(other.to_string())),
        }
    }
}

impl fmt::Display for RankSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RankSetKind::Slice => "slice",
            RankSetKind::Tree => "tree",
        })
    }
}
