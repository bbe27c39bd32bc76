// Property-based tests for the confidence band and decision engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use appeal_engine::confidence::{
    self, ConfidenceResult, MarketCondition, ReliabilityGrade, ValuationEstimate, ValuationMethod,
    MAX_BAND, MIN_BAND,
};
use appeal_engine::decision::{decide, AppealDecision, DecisionInput};
use appeal_engine::jurisdiction::default_priors;
use appeal_engine::money::round_currency;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_method() -> impl Strategy<Value = ValuationMethod> {
    prop_oneof![
        Just(ValuationMethod::SalesComparison),
        Just(ValuationMethod::IncomeApproach),
        Just(ValuationMethod::CostApproach),
        Just(ValuationMethod::AutomatedValuation),
        Just(ValuationMethod::TaxAssessor),
    ]
}

fn arb_market() -> impl Strategy<Value = MarketCondition> {
    prop_oneof![
        Just(MarketCondition::Stable),
        Just(MarketCondition::Improving),
        Just(MarketCondition::Declining),
        Just(MarketCondition::Volatile),
    ]
}

/// Score in [0, 1] with two decimal places
fn arb_unit() -> impl Strategy<Value = Decimal> {
    (0i64..=100).prop_map(|n| Decimal::new(n, 2))
}

/// Whole-dollar value between $1,000 and $50M
fn arb_value() -> impl Strategy<Value = Decimal> {
    (1_000i64..=50_000_000).prop_map(Decimal::from)
}

/// Comparable sales within +/-40% of the central value
fn arb_comparables(central: Decimal) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(60i64..=140, 0..6).prop_map(move |pcts| {
        pcts.into_iter()
            .map(|pct| central * Decimal::new(pct, 2))
            .collect()
    })
}

fn arb_estimate() -> impl Strategy<Value = ValuationEstimate> {
    arb_value().prop_flat_map(|central| {
        (
            Just(central),
            arb_method(),
            arb_comparables(central),
            arb_unit(),
            arb_market(),
            arb_unit(),
            0u32..=1095,
        )
            .prop_map(|(central, method, comps, quality, market, uniqueness, days)| {
                ValuationEstimate::builder(central, method)
                    .with_comparables(comps)
                    .with_data_quality(quality)
                    .with_market_condition(market)
                    .with_uniqueness(uniqueness)
                    .with_days_since_valuation(days)
                    .build()
                    .unwrap()
            })
    })
}

fn band_for(quality: Decimal, uniqueness: Decimal, days: u32) -> Decimal {
    let estimate = ValuationEstimate::builder(dec!(750000), ValuationMethod::CostApproach)
        .with_data_quality(quality)
        .with_uniqueness(uniqueness)
        .with_days_since_valuation(days)
        .build()
        .unwrap();
    confidence::calculate(&estimate).confidence_band_pct
}

/// Market conditions from least to most uncertain
const MARKETS_BY_RISK: [MarketCondition; 4] = [
    MarketCondition::Stable,
    MarketCondition::Improving,
    MarketCondition::Declining,
    MarketCondition::Volatile,
];

fn band_in_market(
    method: ValuationMethod,
    quality: Decimal,
    uniqueness: Decimal,
    days: u32,
    market: MarketCondition,
) -> Decimal {
    let estimate = ValuationEstimate::builder(dec!(750000), method)
        .with_data_quality(quality)
        .with_uniqueness(uniqueness)
        .with_days_since_valuation(days)
        .with_market_condition(market)
        .build()
        .unwrap();
    confidence::calculate(&estimate).confidence_band_pct
}

// ---------------------------------------------------------------------------
// Confidence band properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_band_invariants(estimate in arb_estimate()) {
        let result = confidence::calculate(&estimate);

        prop_assert!(result.confidence_band_pct >= MIN_BAND);
        prop_assert!(result.confidence_band_pct <= MAX_BAND);
        prop_assert!(result.lower_bound >= Decimal::ZERO);
        prop_assert!(result.lower_bound < result.central_estimate);
        prop_assert!(result.central_estimate < result.upper_bound);

        let amount = result.central_estimate * result.confidence_band_pct;
        prop_assert_eq!(result.lower_bound, round_currency(result.central_estimate - amount));
        prop_assert_eq!(result.upper_bound, round_currency(result.central_estimate + amount));

        prop_assert!(result.confidence_score >= Decimal::ZERO);
        prop_assert!(result.confidence_score <= Decimal::ONE);
        prop_assert_eq!(result.reliability_grade, ReliabilityGrade::from_score(result.confidence_score));
        prop_assert!(result.method_consistency > Decimal::ZERO);
        prop_assert!(result.method_consistency <= Decimal::ONE);
    }

    #[test]
    fn prop_grade_monotone_in_band(a in arb_estimate(), b in arb_estimate()) {
        let ra = confidence::calculate(&a);
        let rb = confidence::calculate(&b);
        if ra.confidence_band_pct < rb.confidence_band_pct {
            prop_assert!(ra.confidence_score >= rb.confidence_score);
            prop_assert!(ra.reliability_grade <= rb.reliability_grade);
        }
    }

    #[test]
    fn prop_lower_quality_never_narrows(q1 in arb_unit(), q2 in arb_unit(), u in arb_unit(), days in 0u32..=1095) {
        let (worse, better) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
        prop_assert!(band_for(worse, u, days) >= band_for(better, u, days));
    }

    #[test]
    fn prop_uniqueness_never_narrows(q in arb_unit(), u1 in arb_unit(), u2 in arb_unit(), days in 0u32..=1095) {
        let (low, high) = if u1 <= u2 { (u1, u2) } else { (u2, u1) };
        prop_assert!(band_for(q, high, days) >= band_for(q, low, days));
    }

    #[test]
    fn prop_age_never_narrows(q in arb_unit(), u in arb_unit(), d1 in 0u32..=1095, d2 in 0u32..=1095) {
        let (young, old) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        prop_assert!(band_for(q, u, old) >= band_for(q, u, young));
    }

    #[test]
    fn prop_market_never_narrows(
        method in arb_method(),
        q in arb_unit(),
        u in arb_unit(),
        days in 0u32..=1095,
        m1 in 0usize..4,
        m2 in 0usize..4,
    ) {
        let (calmer, rougher) = if m1 <= m2 { (m1, m2) } else { (m2, m1) };
        prop_assert!(
            band_in_market(method, q, u, days, MARKETS_BY_RISK[rougher])
                >= band_in_market(method, q, u, days, MARKETS_BY_RISK[calmer])
        );
    }
}

// ---------------------------------------------------------------------------
// Decision properties
// ---------------------------------------------------------------------------

fn decision_for(market: Decimal, ratio_pct: i64, band: Decimal, score: Decimal, rate: Decimal) -> appeal_engine::decision::DecisionResult {
    let assessed = market * Decimal::new(ratio_pct, 2);
    let confidence = ConfidenceResult::from_band(market, band, score).unwrap();
    let input = DecisionInput::builder(assessed, market, confidence, default_priors("TX").unwrap(), rate)
        .build()
        .unwrap();
    decide(&input)
}

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn prop_decision_invariants(
        market in (100_000i64..=5_000_000).prop_map(Decimal::from),
        ratio_pct in 50i64..=200,
        band in (5i64..=50).prop_map(|n| Decimal::new(n, 2)),
        score in arb_unit(),
        rate in (5i64..=50).prop_map(|n| Decimal::new(n, 3)),
    ) {
        let result = decision_for(market, ratio_pct, band, score, rate);

        if ratio_pct < 90 {
            prop_assert_eq!(result.decision, AppealDecision::Under);
        }
        if ratio_pct > 120 {
            prop_assert_ne!(result.decision, AppealDecision::Under);
        }
        if result.decision == AppealDecision::Fair {
            prop_assert!(result.within_confidence_band);
        }
        prop_assert_eq!(result.reassessment_risk_warning, result.decision == AppealDecision::Under);

        prop_assert!(result.success_probability >= dec!(0.05));
        prop_assert!(result.success_probability <= dec!(0.95));

        // Default priors always carry costs, so both figures are defined
        prop_assert!(result.expected_roi.is_some());
        prop_assert!(result.breakeven_reduction_pct > Decimal::ZERO);
        prop_assert_eq!(
            result.net_savings_year_1,
            result.expected_annual_savings - result.total_appeal_costs
        );
    }

    #[test]
    fn prop_savings_never_exceed_average_reduction(
        market in (100_000i64..=5_000_000).prop_map(Decimal::from),
        ratio_pct in 100i64..=200,
        rate in (5i64..=50).prop_map(|n| Decimal::new(n, 3)),
    ) {
        let result = decision_for(market, ratio_pct, dec!(0.10), dec!(0.8), rate);
        let assessed = market * Decimal::new(ratio_pct, 2);
        // default priors reduce by 12% at most
        prop_assert!(result.expected_annual_savings >= Decimal::ZERO);
        prop_assert!(result.expected_annual_savings <= round_currency(assessed * dec!(0.12) * rate));
    }
}
