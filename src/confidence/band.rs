//! Confidence band calculation
//!
//! Band = method base + data quality + market + uniqueness + age + dispersion,
//! clamped to [5%, 50%]. The confidence score rescales that range onto
//! [1.0, 0.0].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::dispersion::{coefficient_of_variation, method_consistency};
use super::estimate::ValuationEstimate;
use super::types::{
    band_bounds, ConfidenceResult, ReliabilityGrade, ValuationMethod, MAX_BAND, MIN_BAND,
};
use crate::money::{round_currency, round_rate};

const QUALITY_WEIGHT: Decimal = dec!(0.15);
const UNIQUENESS_WEIGHT: Decimal = dec!(0.10);
const AGE_WEIGHT_PER_YEAR: Decimal = dec!(0.01);
const MAX_AGE_ADJUSTMENT: Decimal = dec!(0.15);
const DISPERSION_WEIGHT: Decimal = dec!(0.5);

/// Band components before clamping
#[derive(Debug, Clone, Default)]
struct BandComponents {
    base: Decimal,
    quality: Decimal,
    market: Decimal,
    uniqueness: Decimal,
    age: Decimal,
    dispersion: Decimal,
}

impl BandComponents {
    fn total(&self) -> Decimal {
        self.base + self.quality + self.market + self.uniqueness + self.age + self.dispersion
    }
}

/// Compute the confidence band around a validated estimate
pub fn calculate(estimate: &ValuationEstimate) -> ConfidenceResult {
    let cv = coefficient_of_variation(&estimate.all_estimates());

    let components = BandComponents {
        base: estimate.method().base_band(),
        quality: (Decimal::ONE - estimate.data_quality_score()) * QUALITY_WEIGHT,
        market: estimate.market_condition().band_adjustment(),
        uniqueness: estimate.property_uniqueness() * UNIQUENESS_WEIGHT,
        age: age_adjustment(estimate.days_since_valuation()),
        dispersion: cv.map(|cv| cv * DISPERSION_WEIGHT).unwrap_or_default(),
    };

    let band = round_rate(components.total().clamp(MIN_BAND, MAX_BAND));
    let central = round_currency(estimate.estimated_market_value());
    let (lower_bound, upper_bound) = band_bounds(central, band);

    let confidence_score = round_rate(score_for_band(band));
    let reliability_grade = ReliabilityGrade::from_score(confidence_score);

    let estimate_dispersion = cv.map(round_rate);
    let consistency = cv.map(method_consistency).unwrap_or(Decimal::ONE);

    let risk_factors = risk_factors(estimate, estimate_dispersion);

    tracing::debug!(
        method = %estimate.method(),
        base = %components.base,
        quality = %components.quality,
        market = %components.market,
        uniqueness = %components.uniqueness,
        age = %components.age,
        dispersion = %components.dispersion,
        band = %band,
        grade = %reliability_grade,
        "Calculated confidence band"
    );

    ConfidenceResult {
        central_estimate: central,
        confidence_band_pct: band,
        lower_bound,
        upper_bound,
        confidence_score,
        reliability_grade,
        estimate_dispersion,
        method_consistency: round_rate(consistency),
        risk_factors,
    }
}

/// 1% per year of age, capped at 15%
fn age_adjustment(days: u32) -> Decimal {
    if days == 0 {
        return Decimal::ZERO;
    }
    let years = Decimal::from(days) / dec!(365);
    (years * AGE_WEIGHT_PER_YEAR).min(MAX_AGE_ADJUSTMENT)
}

/// Map a band in [5%, 50%] linearly onto a score in [1, 0]
fn score_for_band(band: Decimal) -> Decimal {
    let score = Decimal::ONE - (band - MIN_BAND) / (MAX_BAND - MIN_BAND);
    score.clamp(Decimal::ZERO, Decimal::ONE)
}

fn risk_factors(estimate: &ValuationEstimate, dispersion: Option<Decimal>) -> Vec<String> {
    let mut risks = Vec::new();

    if estimate.data_quality_score() < dec!(0.6) {
        risks.push("Low data quality".to_string());
    }
    if estimate.property_uniqueness() > dec!(0.7) {
        risks.push("Highly unique property".to_string());
    }
    if estimate.market_condition().is_unstable() {
        risks.push(format!(
            "Unstable market conditions ({})",
            estimate.market_condition()
        ));
    }
    if estimate.days_since_valuation() > 365 {
        risks.push("Valuation more than 1 year old".to_string());
    }
    if estimate.method() == ValuationMethod::SalesComparison
        && estimate.comparable_sales().len() < 3
    {
        risks.push("Limited comparable sales data".to_string());
    }
    if dispersion.is_some_and(|d| d > dec!(0.25)) {
        risks.push("High dispersion between estimates".to_string());
    }

    risks
}
