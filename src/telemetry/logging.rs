//! Structured logging setup

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Initialize logging with the given level and format
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so command output on stdout stays machine readable.
pub fn init_logging(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to init logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }

        let parsed: Wrapper = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
        let parsed: Wrapper = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(parsed.format, LogFormat::Pretty);
        assert!(toml::from_str::<Wrapper>(r#"format = "xml""#).is_err());
    }
}
