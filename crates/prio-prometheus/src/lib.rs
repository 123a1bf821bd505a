//! Prometheus metrics backend for prio races.
//!
//! [`PrometheusMetrics`] implements [`prio_core::MetricsBackend`]; hand it to the controller builder
//! and expose [`PrometheusMetrics::gather`] from your own `/metrics` endpoint.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use prio_core::RaceController;
//! use prio_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let controller: RaceController<String> = RaceController::builder()
//!     .with_metrics(Arc::new(metrics.clone()))
//!     .build();
//! # drop(controller);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `prio_races_started_total` - Counter
//! - `prio_race_tasks` - Histogram of tasks per race
//! - `prio_reports_total{outcome}` - Counter
//! - `prio_races_finished_total{outcome}` - Counter
//! - `prio_race_duration_seconds{outcome}` - Histogram
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
