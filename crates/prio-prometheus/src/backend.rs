use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    proto::MetricFamily,
};

use prio_core::{MetricsBackend, RaceOutcome, ReportOutcome};

const NAMESPACE: &str = "prio";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// Both label sets are closed enums:
/// - report `outcome`: "success", "failure", "panicked", "abandoned"
/// - race `outcome`: "optimal", "fallback", "no_result", "canceled", "deadline_exceeded", "invariant"
#[derive(Clone)]
pub struct PrometheusMetrics {
    races_started: Counter,
    race_tasks: Histogram,
    reports: CounterVec,
    races_finished: CounterVec,
    race_duration: HistogramVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Register all collectors in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let races_started = Counter::with_opts(
            Opts::new("races_started_total", "Total number of races started").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(races_started.clone()))?;

        let race_tasks = Histogram::with_opts(
            HistogramOpts::new("race_tasks", "Number of tasks registered per race")
                .namespace(NAMESPACE)
                .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0]),
        )?;
        registry.register(Box::new(race_tasks.clone()))?;

        let reports = CounterVec::new(
            Opts::new("reports_total", "Task reports seen by races").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(reports.clone()))?;

        let races_finished = CounterVec::new(
            Opts::new("races_finished_total", "Total number of races settled")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(races_finished.clone()))?;

        let race_duration = HistogramVec::new(
            HistogramOpts::new(
                "race_duration_seconds",
                "Time from launch to decision in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(race_duration.clone()))?;

        Ok(Self {
            races_started,
            race_tasks,
            reports,
            races_finished,
            race_duration,
            registry,
        })
    }

    /// Backend with a private registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_race_started(&self, tasks: usize) {
        self.races_started.inc();
        self.race_tasks.observe(tasks as f64);
    }

    fn record_report(&self, outcome: ReportOutcome) {
        self.reports.with_label_values(&[outcome.as_label()]).inc();
    }

    fn record_race_finished(&self, outcome: RaceOutcome, duration_ms: u64) {
        let label = outcome.as_label();
        self.races_finished.with_label_values(&[label]).inc();
        self.race_duration
            .with_label_values(&[label])
            .observe(duration_ms as f64 / 1000.0);
    }
}
