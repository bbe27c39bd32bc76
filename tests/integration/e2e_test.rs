//! End-to-end integration tests

use std::sync::Arc;

use appeal_engine::confidence::{self, ConfidenceResult, MarketCondition, ValuationEstimate, ValuationMethod};
use appeal_engine::config::EngineConfig;
use appeal_engine::decision::{decide, AppealDecision, ConfidenceLevel, DecisionInput};
use appeal_engine::finance::{calculate_cap_rate, CapRateInput};
use appeal_engine::jurisdiction::{default_priors, InMemoryPriorsStore, JurisdictionPriors};
use appeal_engine::portfolio::{evaluate_portfolio, Evaluator, PortfolioEntry, PropertyRequest};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn test_county(average_reduction: rust_decimal::Decimal) -> JurisdictionPriors {
    JurisdictionPriors::builder("test_county", "Test County", "TX")
        .with_success_rate(dec!(0.40))
        .with_average_reduction(average_reduction)
        .with_filing_fee(dec!(500))
        .with_attorney_cost(dec!(2500))
        .build()
        .unwrap()
}

fn ten_percent_band() -> ConfidenceResult {
    ConfidenceResult::from_band(dec!(1000000), dec!(0.10), dec!(0.8)).unwrap()
}

#[test]
fn test_sales_comparison_band() {
    let estimate = ValuationEstimate::builder(dec!(1000000), ValuationMethod::SalesComparison)
        .with_data_quality(dec!(0.8))
        .with_market_condition(MarketCondition::Stable)
        .with_uniqueness(dec!(0))
        .build()
        .unwrap();

    let result = confidence::calculate(&estimate);
    assert!(result.confidence_band_pct >= dec!(0.10));
    assert!(result.confidence_band_pct <= dec!(0.15));
    assert!(result.lower_bound >= dec!(850000) && result.lower_bound <= dec!(900000));
    assert!(result.upper_bound >= dec!(1100000) && result.upper_bound <= dec!(1150000));
}

#[test]
fn test_clear_over_assessment() {
    let input = DecisionInput::builder(
        dec!(1300000),
        dec!(1000000),
        ten_percent_band(),
        test_county(dec!(0.20)),
        dec!(0.025),
    )
    .with_filing_fee(dec!(500))
    .with_attorney_fee(dec!(2000))
    .build()
    .unwrap();

    let result = decide(&input);
    assert_eq!(result.decision, AppealDecision::Over);
    assert_eq!(result.assessment_ratio, dec!(1.30));
    assert!(result.expected_annual_savings > dec!(5000));
    assert!(result.expected_roi.unwrap() > dec!(100));
    assert!(matches!(
        result.confidence_level,
        ConfidenceLevel::High | ConfidenceLevel::Medium
    ));
}

#[test]
fn test_fair_within_band() {
    let input = DecisionInput::builder(
        dec!(1050000),
        dec!(1000000),
        ten_percent_band(),
        test_county(dec!(0.15)),
        dec!(0.025),
    )
    .build()
    .unwrap();

    let result = decide(&input);
    assert_eq!(result.decision, AppealDecision::Fair);
    assert!(result.within_confidence_band);
}

#[test]
fn test_under_assessment_warns() {
    let input = DecisionInput::builder(
        dec!(800000),
        dec!(1000000),
        ten_percent_band(),
        test_county(dec!(0.15)),
        dec!(0.025),
    )
    .build()
    .unwrap();

    let result = decide(&input);
    assert_eq!(result.decision, AppealDecision::Under);
    assert!(result.reassessment_risk_warning);
    assert!(result.expected_annual_savings < dec!(0));
}

#[test]
fn test_cap_rate_agrees_with_savings_math() {
    let implied = calculate_cap_rate(&CapRateInput::from_target_rate(dec!(85000), dec!(0.085)).unwrap())
        .implied_value
        .unwrap();
    assert_eq!(implied, dec!(1000000.00));

    // Feeding the implied value through as the market estimate gives the worked savings
    let input = DecisionInput::builder(
        dec!(1200000),
        implied,
        ConfidenceResult::from_band(implied, dec!(0.10), dec!(0.8)).unwrap(),
        test_county(dec!(0.15)),
        dec!(0.025),
    )
    .with_filing_fee(dec!(500))
    .with_attorney_fee(dec!(2000))
    .with_horizon_years(4)
    .build()
    .unwrap();

    let result = decide(&input);
    assert_eq!(result.expected_annual_savings, dec!(4500.00));
    assert_eq!(result.total_appeal_costs, dec!(2500.00));
    assert_eq!(result.expected_roi, Some(dec!(620.00)));
}

#[test]
fn test_estimate_to_decision_pipeline() {
    let estimate = ValuationEstimate::builder(dec!(1000000), ValuationMethod::SalesComparison)
        .with_comparables([dec!(990000), dec!(1010000), dec!(1000000)])
        .with_data_quality(dec!(0.9))
        .with_uniqueness(dec!(0.2))
        .build()
        .unwrap();
    let band = confidence::calculate(&estimate);
    assert!(band.reliability_grade.is_high_quality());
    assert!(band.risk_factors.is_empty());

    let input = DecisionInput::builder(
        dec!(1400000),
        band.central_estimate,
        band.clone(),
        default_priors("tx").unwrap(),
        dec!(0.022),
    )
    .build()
    .unwrap();

    let result = decide(&input);
    assert_eq!(result.decision, AppealDecision::Over);
    assert!(!result.within_confidence_band);
    assert_eq!(result.total_appeal_costs, dec!(3500));
    assert!(result.is_appeal_recommended());
}

#[test]
fn test_decision_serializes_decimals_as_strings() {
    let input = DecisionInput::builder(
        dec!(1300000),
        dec!(1000000),
        ten_percent_band(),
        test_county(dec!(0.20)),
        dec!(0.025),
    )
    .build()
    .unwrap();

    let value = serde_json::to_value(decide(&input)).unwrap();
    assert_eq!(value["decision"], "OVER");
    assert_eq!(value["assessment_ratio"], "1.30");
    assert!(value["expected_annual_savings"].is_string());
    assert!(value["confidence_level"].is_string());

    let band = serde_json::to_value(ten_percent_band()).unwrap();
    assert_eq!(band["lower_bound"], "900000.00");
    assert_eq!(band["confidence_band_pct"], "0.100");
    assert_eq!(band["reliability_grade"], "A");
}

#[tokio::test]
async fn test_portfolio_from_json() {
    let json = r#"[
        {
            "property_id": "office-1",
            "assessed_value": "1300000",
            "tax_rate": "0.025",
            "region": "TX",
            "jurisdiction_id": "test_county",
            "valuation": {
                "method": "income_approach",
                "estimated_market_value": "1000000",
                "data_quality_score": "0.85"
            },
            "income_approach": {"net_operating_income": "85000", "target_cap_rate": "0.085"},
            "costs": {"filing_fee": "500", "attorney_fee": "2000"}
        },
        {
            "property_id": "house-2",
            "assessed_value": "410000",
            "tax_rate": "21",
            "tax_rate_basis": "per_thousand",
            "region": "OH",
            "valuation": {
                "method": "automated_valuation",
                "estimated_market_value": "400000",
                "market_conditions": "Improving",
                "valuation_date": "2024-09-15"
            }
        },
        {
            "property_id": "broken-3",
            "assessed_value": "500000",
            "tax_rate": "0.02",
            "region": "Ohio",
            "valuation": {
                "method": "cost_approach",
                "estimated_market_value": "450000"
            }
        }
    ]"#;
    let requests: Vec<PropertyRequest> = serde_json::from_str(json).unwrap();

    let mut store = InMemoryPriorsStore::new();
    store.insert(test_county(dec!(0.15)));
    let evaluator = Evaluator::new(EngineConfig::default(), store)
        .with_as_of(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

    let entries = evaluate_portfolio(Arc::new(evaluator), requests).await;
    assert_eq!(entries.len(), 3);

    let office = entries[0].outcome().unwrap();
    assert_eq!(office.jurisdiction_id, "test_county");
    assert_eq!(office.decision.decision, AppealDecision::Over);

    let house = entries[1].outcome().unwrap();
    assert_eq!(house.jurisdiction_id, "default_oh");
    assert_eq!(house.decision.decision, AppealDecision::Fair);

    match &entries[2] {
        PortfolioEntry::Rejected { property_id, field, .. } => {
            assert_eq!(property_id, "broken-3");
            assert_eq!(*field, "region");
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    let rendered = serde_json::to_value(&entries).unwrap();
    assert_eq!(rendered[0]["status"], "evaluated");
    assert_eq!(rendered[2]["status"], "rejected");
}
