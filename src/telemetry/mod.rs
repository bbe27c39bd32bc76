//! Telemetry module
//!
//! Logging and metrics

mod logging;
mod metrics;

pub use self::logging::{init_logging, LogFormat};
pub use self::metrics::{record_decision, record_latency, record_validation_failure, LatencyMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)
}
