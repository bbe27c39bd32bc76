//! Engine metrics
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the host
//! process installs a recorder.

use std::time::Duration;

use crate::decision::AppealDecision;
use crate::error::ValidationError;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Confidence band plus decision for one property
    Evaluation,
    /// A whole portfolio batch
    Portfolio,
}

impl LatencyMetric {
    fn name(&self) -> &'static str {
        match self {
            LatencyMetric::Evaluation => "appeal_engine_evaluation_latency_ms",
            LatencyMetric::Portfolio => "appeal_engine_portfolio_latency_ms",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    ::metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Count a completed decision by its tag
pub fn record_decision(decision: AppealDecision) {
    ::metrics::counter!("appeal_engine_decisions_total", "decision" => decision.as_str())
        .increment(1);
}

/// Count a request rejected during validation
pub fn record_validation_failure(error: &ValidationError) {
    ::metrics::counter!(
        "appeal_engine_validation_failures_total",
        "kind" => error.kind(),
        "field" => error.field()
    )
    .increment(1);
}
