//! Configuration types for appeal-engine

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decision::{
    DEFAULT_HORIZON_YEARS, DEFAULT_MIN_ROI_THRESHOLD, DEFAULT_MIN_SAVINGS_THRESHOLD,
};
use crate::error::ValidationError;
use crate::jurisdiction::{InMemoryPriorsStore, PriorsRecord};
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Known jurisdictions; anything else falls back to regional defaults
    #[serde(default)]
    pub jurisdictions: Vec<PriorsRecord>,
}

/// Decision thresholds applied when a request does not override them
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// ROI multiple an appeal must beat (2.0 = 200%)
    #[serde(default = "default_min_roi_threshold")]
    pub min_roi_threshold: Decimal,

    /// Annual savings below this are not worth an appeal
    #[serde(default = "default_min_savings_threshold")]
    pub min_savings_threshold: Decimal,

    /// Years of savings counted toward the return
    #[serde(default = "default_horizon_years")]
    pub appeal_horizon_years: u32,
}

fn default_min_roi_threshold() -> Decimal {
    DEFAULT_MIN_ROI_THRESHOLD
}
fn default_min_savings_threshold() -> Decimal {
    DEFAULT_MIN_SAVINGS_THRESHOLD
}
fn default_horizon_years() -> u32 {
    DEFAULT_HORIZON_YEARS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_roi_threshold: DEFAULT_MIN_ROI_THRESHOLD,
            min_savings_threshold: DEFAULT_MIN_SAVINGS_THRESHOLD,
            appeal_horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        // Fail at startup rather than on the first request that hits a bad record
        config
            .priors_store()
            .with_context(|| format!("invalid jurisdiction in {}", path.display()))?;
        Ok(config)
    }

    /// Build the priors store from the configured jurisdictions
    pub fn priors_store(&self) -> Result<InMemoryPriorsStore, ValidationError> {
        InMemoryPriorsStore::from_records(&self.jurisdictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::PriorsStore;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [engine]
            min_roi_threshold = 1.5
            min_savings_threshold = 500
            appeal_horizon_years = 4

            [telemetry]
            log_level = "debug"
            log_format = "json"

            [[jurisdictions]]
            id = "travis_tx"
            name = "Travis County"
            region = "tx"
            appeal_success_rate = 0.42
            typical_filing_fee = 0
            typical_attorney_cost = 1800
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.min_roi_threshold, dec!(1.5));
        assert_eq!(config.engine.min_savings_threshold, dec!(500));
        assert_eq!(config.engine.appeal_horizon_years, 4);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert_eq!(config.jurisdictions.len(), 1);

        let store = config.priors_store().unwrap();
        let priors = store.lookup("travis_tx").unwrap();
        assert_eq!(priors.region(), "TX");
        assert_eq!(priors.appeal_success_rate(), dec!(0.42));
        assert_eq!(priors.typical_total_cost(), dec!(1800));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.engine.min_roi_threshold, dec!(2.0));
        assert_eq!(config.engine.appeal_horizon_years, 3);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        assert!(config.jurisdictions.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [engine]
            appeal_horizon_years = 5

            [[jurisdictions]]
            id = "cook_il"
            name = "Cook County"
            region = "IL"
            cod_target = 0.15
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.engine.appeal_horizon_years, 5);
        let priors = config.priors_store().unwrap().lookup("cook_il").unwrap();
        assert_eq!(priors.cod_target(), dec!(0.15));
    }

    #[test]
    fn test_load_rejects_invalid_jurisdiction() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [[jurisdictions]]
            id = "bad"
            name = "Bad County"
            region = "Texas"
            "#
        )
        .unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid jurisdiction"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.engine, config.engine);
        assert_eq!(parsed.telemetry, config.telemetry);
    }
}
