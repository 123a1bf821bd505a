//! Rank-ordered task racing.
//!
//! A [`RaceController`] runs every registered [`RankedTask`] concurrently and returns the
//! result of the highest-ranked task that succeeded, without waiting for slower, lower-ranked
//! tasks once the answer is provably final.
pub mod context;
pub mod controller;
pub mod error;
pub mod metrics;
pub mod rankset;
pub mod task;

pub use context::RaceContext;
pub use controller::{RaceController, RaceControllerBuilder, TaskReport};
pub use error::RaceError;
pub use metrics::{
    MetricsBackend, MetricsHandle, NoOpMetrics, RaceOutcome, ReportOutcome, noop_metrics,
};
pub use rankset::{RankSlice, RankTree, RankedMultiset};
pub use task::{RankedTask, TaskError, TaskFn, TaskRef};

pub mod prelude {
    pub use crate::context::RaceContext;
    pub use crate::controller::RaceController;
    pub use crate::error::RaceError;
    pub use crate::rankset::RankedMultiset;
    pub use crate::task::{RankedTask, TaskError, TaskFn, TaskRef};
    pub use prio_model::Rank;
}
