//! Over / fair / under classification and appeal economics

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use super::input::DecisionInput;
use super::types::{AppealDecision, ConfidenceLevel, DecisionResult};
use crate::finance::SavingsProjection;
use crate::money::{round_currency, round_percent};

/// Ratios below this are treated as under-assessed
const UNDER_ASSESSED_RATIO: Decimal = dec!(0.90);
const MAX_BAND_BOOST: Decimal = dec!(0.3);
const MAX_BOOSTED_PROBABILITY: Decimal = dec!(0.9);
const UNDER_BAND_PROBABILITY_CAP: Decimal = dec!(0.2);
const MIN_PROBABILITY: Decimal = dec!(0.05);
const MAX_PROBABILITY: Decimal = dec!(0.95);
const HUNDRED: Decimal = dec!(100);

/// Classify an assessment and project the economics of appealing it
pub fn decide(input: &DecisionInput) -> DecisionResult {
    let assessed = input.assessed_value();
    let market = input.estimated_market_value();
    let confidence = input.confidence();
    let priors = input.priors();

    let ratio = assessed / market;
    let within_band = confidence.contains(assessed);

    // A successful appeal is assumed to land on the typical reduction, never below market
    let reduced = (assessed * (Decimal::ONE - priors.average_reduction_pct())).max(market);
    let total_costs = input.total_costs();
    let projection = SavingsProjection::new(
        assessed,
        reduced,
        input.tax_rate(),
        total_costs,
        input.horizon_years(),
    );
    let annual_savings = projection.annual_savings;
    let expected_roi = projection.roi_pct().map(round_percent);
    let breakeven = round_percent(breakeven_reduction_pct(input, total_costs));
    let probability = success_probability(input, ratio, within_band);

    let roi_threshold_pct = input.min_roi_threshold() * HUNDRED;
    let mut rationale = Vec::new();
    let mut risks = Vec::new();
    let mut support = Vec::new();

    let decision = if ratio < UNDER_ASSESSED_RATIO {
        AppealDecision::Under
    } else if ratio <= Decimal::ONE + priors.cod_target() && within_band {
        AppealDecision::Fair
    } else {
        AppealDecision::Over
    };

    match decision {
        AppealDecision::Under => {
            rationale.push(format!(
                "Assessment is {}% below estimated market value",
                round_percent((Decimal::ONE - ratio) * HUNDRED)
            ));
            rationale.push("Appealing could result in a higher assessment".to_string());

            risks.push("High risk of assessment increase upon review".to_string());
            risks.push("May trigger county-wide reassessment attention".to_string());
            if priors.reassessment_risk_factor() > dec!(0.1) {
                risks.push("Jurisdiction has history of reassessment increases".to_string());
            }
        }
        AppealDecision::Fair => {
            rationale.push("Assessment is within reasonable bounds of market value".to_string());
            rationale.push(format!(
                "Assessment ratio of {}% is reasonable",
                round_percent(ratio * HUNDRED)
            ));
            rationale.push("Assessment falls within valuation confidence band".to_string());

            match expected_roi {
                Some(roi)
                    if roi > roi_threshold_pct && annual_savings > input.min_savings_threshold() =>
                {
                    support.push(format!("Appeal could still provide {roi}% ROI"));
                }
                _ => risks.push("Expected savings may not justify appeal costs".to_string()),
            }
        }
        AppealDecision::Over => {
            rationale.push(format!(
                "Assessment appears {}% above estimated market value",
                round_percent((ratio - Decimal::ONE) * HUNDRED)
            ));
            if !within_band {
                rationale.push(format!(
                    "Assessment is outside {}% confidence band",
                    round_percent(confidence.confidence_band_pct * HUNDRED)
                ));
            }

            // Without costs the return is undefined and there is nothing to weigh
            if let Some(roi) = expected_roi {
                let threshold = round_percent(roi_threshold_pct);
                if roi > roi_threshold_pct {
                    rationale.push(format!("Expected ROI of {roi}% exceeds {threshold}% threshold"));
                } else {
                    risks.push(format!("Expected ROI of {roi}% is below {threshold}% threshold"));
                }
            }

            if annual_savings > input.min_savings_threshold() {
                support.push(format!(
                    "Expected annual savings of ${} exceeds threshold",
                    round_currency(annual_savings)
                ));
            } else {
                risks.push(format!(
                    "Expected annual savings below ${} threshold",
                    input.min_savings_threshold()
                ));
            }
        }
    }

    let confidence_level = confidence_level(input, ratio, probability);

    let grade = confidence.reliability_grade;
    if !grade.is_high_quality() {
        risks.push(format!("Valuation reliability grade: {grade}"));
    }
    if probability < dec!(0.4) {
        risks.push("Below-average probability of success in this jurisdiction".to_string());
    }
    if decision == AppealDecision::Over {
        if probability > dec!(0.6) {
            support.push("Above-average probability of success".to_string());
        }
        if grade.is_high_quality() {
            support.push(format!("High-quality valuation (Grade {grade})"));
        }
    }
    if total_costs > Decimal::ZERO && breakeven > HUNDRED {
        risks.push(format!(
            "Breakeven reduction of {breakeven}% exceeds the full assessed value"
        ));
    }

    debug!(
        decision = %decision,
        confidence = %confidence_level,
        ratio = %ratio.round_dp(4),
        within_band,
        probability = %probability.round_dp(4),
        "Appeal decision"
    );

    DecisionResult {
        decision,
        confidence_level,
        assessment_ratio: round_percent(ratio),
        expected_annual_savings: round_currency(annual_savings),
        expected_roi,
        breakeven_reduction_pct: breakeven,
        primary_rationale: rationale,
        risk_factors: risks,
        supporting_factors: support,
        within_confidence_band: within_band,
        success_probability: round_percent(probability),
        reassessment_risk_warning: decision == AppealDecision::Under,
        total_appeal_costs: round_currency(total_costs),
        net_savings_year_1: round_currency(projection.net_first_year()),
        cumulative_net_savings: round_currency(projection.cumulative_net()),
    }
}

/// Percent of assessed value the appeal must remove to recoup its costs
///
/// Saturates at `Decimal::MAX` when a tiny tax rate pushes it out of range.
fn breakeven_reduction_pct(input: &DecisionInput, total_costs: Decimal) -> Decimal {
    if total_costs <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let annual_recovery = total_costs / Decimal::from(input.horizon_years());
    annual_recovery
        .checked_div(input.tax_rate())
        .and_then(|amount| amount.checked_div(input.assessed_value()))
        .and_then(|fraction| fraction.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
}

/// Jurisdiction base rate adjusted for band position and valuation confidence
fn success_probability(input: &DecisionInput, ratio: Decimal, within_band: bool) -> Decimal {
    let confidence = input.confidence();
    let mut probability = input.priors().appeal_success_rate();

    if !within_band {
        if ratio > Decimal::ONE {
            let excess = ratio - Decimal::ONE;
            if excess > confidence.confidence_band_pct {
                let boost = (excess * dec!(0.5)).min(MAX_BAND_BOOST);
                probability = (probability + boost).min(MAX_BOOSTED_PROBABILITY);
            }
        } else {
            // Review of an under-assessed property tends to go the other way
            probability = (probability * dec!(0.3)).min(UNDER_BAND_PROBABILITY_CAP);
        }
    }

    let adjustment = (confidence.confidence_score - dec!(0.5)) * dec!(0.2);
    (probability + adjustment).clamp(MIN_PROBABILITY, MAX_PROBABILITY)
}

fn confidence_level(input: &DecisionInput, ratio: Decimal, probability: Decimal) -> ConfidenceLevel {
    let confidence = input.confidence();
    let mut points = 0u8;

    if confidence.confidence_score > dec!(0.7) {
        points += 2;
    } else if confidence.confidence_score > dec!(0.5) {
        points += 1;
    }

    if ratio > dec!(1.15) || ratio < dec!(0.85) {
        points += 2;
    } else if ratio > dec!(1.10) || ratio < dec!(0.90) {
        points += 1;
    }

    if probability > dec!(0.6) {
        points += 1;
    }

    if confidence.risk_factors.len() <= 2 {
        points += 1;
    }

    ConfidenceLevel::from_points(points)
}
