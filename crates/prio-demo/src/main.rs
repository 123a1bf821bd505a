use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing::{info, warn};

use prio_core::{RaceContext, RaceController, RaceError, TaskError, TaskFn, TaskRef, rankset};
use prio_model::{Rank, RaceSpec};
use prio_observe::{LoggerConfig, init_local_offset, init_logger};
use prio_prometheus::{Encoder, PrometheusMetrics, TextEncoder};

/// JSON `RaceSpec`, e.g. `{"timeoutMs": 150, "rankset": "tree"}`.
const ENV_RACE_SPEC: &str = "PRIO_RACE_SPEC";
/// Comma-separated source names forced to fail, e.g. `primary,mirror`.
const ENV_FAIL: &str = "PRIO_DEMO_FAIL";

/// Simulated lookup source.
struct Source {
    name: &'static str,
    rank: Rank,
    latency: Duration,
}

const SOURCES: &[Source] = &[
    Source {
        name: "primary",
        rank: 3,
        latency: Duration::from_millis(120),
    },
    Source {
        name: "mirror",
        rank: 2,
        latency: Duration::from_millis(60),
    },
    Source {
        name: "edge-cache",
        rank: 1,
        latency: Duration::from_millis(5),
    },
];

fn lookup_task(source: &'static Source, key: Arc<str>, failing: bool) -> TaskRef<String> {
    TaskFn::arc(source.name, source.rank, move |ctx: RaceContext| {
        let key = key.clone();
        async move {
            tokio::select! {
                _ = ctx.done() => Err(TaskError::Canceled),
                _ = tokio::time::sleep(source.latency) => {
                    if failing {
                        Err(TaskError::fail(format!("{} unavailable", source.name)))
                    } else {
                        Ok(format!("{key}@{}", source.name))
                    }
                }
            }
        }
    })
}

fn race_spec() -> anyhow::Result<RaceSpec> {
    match std::env::var(ENV_RACE_SPEC) {
        Ok(raw) => serde_json::from_str(&raw).with_context(|| format!("parsing {ENV_RACE_SPEC}")),
        Err(_) => Ok(RaceSpec::default().with_timeout_ms(200)),
    }
}

fn main() -> anyhow::Result<()> {
    // Before the runtime spawns worker threads.
    init_local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    // 1) logger
    init_logger(&LoggerConfig::from_env()?)?;
    info!("logger initialized");

    // 2) metrics
    let metrics = PrometheusMetrics::new()?;

    // 3) controller
    let spec = race_spec()?;
    spec.validate()?;
    let mut controller = RaceController::builder()
        .with_rankset(rankset::from_kind(spec.rankset))
        .with_metrics(Arc::new(metrics.clone()))
        .build();

    let failing: Vec<String> = std::env::var(ENV_FAIL)
        .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();

    let key: Arc<str> = Arc::from("user:42");
    for source in SOURCES {
        let fails = failing.iter().any(|f| f == source.name);
        controller.add_task(lookup_task(source, key.clone(), fails));
    }

    // 4) race
    match controller.run(RaceContext::from_spec(&spec)).await {
        Ok(value) => info!(%value, "lookup resolved"),
        Err(RaceError::NoResult) => warn!("every source failed"),
        Err(e) => warn!(error = %e, "lookup gave up"),
    }

    // 5) metrics dump
    let mut buf = Vec::new();
    TextEncoder::new().encode(&metrics.gather(), &mut buf)?;
    println!("{}", String::from_utf8(buf)?);
    Ok(())
}
