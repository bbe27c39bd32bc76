//! Configuration loading feeding the evaluator

use std::io::Write;

use appeal_engine::config::Config;
use appeal_engine::decision::AppealDecision;
use appeal_engine::jurisdiction::PriorsStore;
use appeal_engine::portfolio::{Evaluator, PropertyRequest};
use rust_decimal_macros::dec;

const CONFIG: &str = r#"
[engine]
min_roi_threshold = 50.0
min_savings_threshold = 250
appeal_horizon_years = 2

[telemetry]
log_level = "warn"
log_format = "json"

[[jurisdictions]]
id = "harris_tx"
name = "Harris County"
region = "TX"
appeal_success_rate = 0.55
average_reduction_pct = 0.10
typical_filing_fee = 0
typical_attorney_cost = 1200
average_timeline_days = 120
cod_target = 0.12
last_revaluation_year = 2023
"#;

fn request() -> PropertyRequest {
    serde_json::from_str(
        r#"{
            "property_id": "home-1",
            "assessed_value": "520000",
            "tax_rate": "0.021",
            "region": "TX",
            "jurisdiction_id": "harris_tx",
            "valuation": {
                "method": "sales_comparison",
                "estimated_market_value": "450000",
                "comparable_sales": ["445000", "452000", "460000"],
                "data_quality_score": "0.9",
                "property_uniqueness": "0.2"
            }
        }"#,
    )
    .unwrap()
}

#[test]
fn test_configured_jurisdiction_and_thresholds() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.engine.appeal_horizon_years, 2);

    let store = config.priors_store().unwrap();
    let priors = store.resolve(Some("harris_tx"), "TX").unwrap();
    assert_eq!(priors.last_revaluation_year(), Some(2023));
    assert_eq!(priors.average_timeline_days(), 120);

    let evaluator = Evaluator::new(config.engine.clone(), store);
    let outcome = evaluator.evaluate(&request()).unwrap();

    assert_eq!(outcome.jurisdiction_id, "harris_tx");
    assert_eq!(outcome.decision.decision, AppealDecision::Over);
    assert_eq!(outcome.decision.total_appeal_costs, dec!(1200));
    // 520k reduced 10% to 468k saves 52k of value at 2.1%
    assert_eq!(outcome.decision.expected_annual_savings, dec!(1092));
    // Two years against a 5000% bar: (2184 - 1200) / 1200 = 82%
    assert_eq!(outcome.decision.expected_roi, Some(dec!(82.00)));
    assert!(outcome
        .decision
        .risk_factors
        .contains(&"Expected ROI of 82.00% is below 5000.00% threshold".to_string()));
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("appeal-engine.toml");

    assert!(Config::load(&path).is_err());
    let config = Config::default();
    let store = config.priors_store().unwrap();
    assert!(store.is_empty());

    let priors = store.resolve(Some("harris_tx"), "TX").unwrap();
    assert_eq!(priors.jurisdiction_id(), "default_tx");
}
