use crate::metrics::backend::{MetricsBackend, RaceOutcome, ReportOutcome};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_race_started(&self, _: usize) {}

    #[inline(always)]
    fn record_report(&self, _: ReportOutcome) {}

    #[inline(always)]
    fn record_race_finished(&self, _: RaceOutcome, _: u64) {}
}
