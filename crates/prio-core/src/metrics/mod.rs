//! Metrics collection abstraction for races.
//!
//! Backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected through
//! [`RaceControllerBuilder::with_metrics`](crate::RaceControllerBuilder::with_metrics).
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, RaceOutcome, ReportOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
