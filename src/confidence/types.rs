//! Confidence band types

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_plausible_amount, ensure_positive, ensure_unit_interval, ensure_within, ValidationError,
};
use crate::money::{round_currency, round_rate};

/// Smallest band the calculator will report
pub const MIN_BAND: Decimal = dec!(0.05);
/// Widest band the calculator will report
pub const MAX_BAND: Decimal = dec!(0.50);

/// Smallest central estimate that still yields distinct bounds at cent precision
pub const MIN_CENTRAL_ESTIMATE: Decimal = dec!(1.00);

/// How the central value estimate was produced
///
/// Variants are ordered roughly by increasing uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    SalesComparison,
    IncomeApproach,
    CostApproach,
    AutomatedValuation,
    TaxAssessor,
}

impl ValuationMethod {
    /// Starting band width for estimates produced by this method
    pub fn base_band(&self) -> Decimal {
        match self {
            ValuationMethod::SalesComparison => dec!(0.10),
            ValuationMethod::IncomeApproach => dec!(0.15),
            ValuationMethod::CostApproach => dec!(0.20),
            ValuationMethod::AutomatedValuation => dec!(0.25),
            ValuationMethod::TaxAssessor => dec!(0.30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::SalesComparison => "sales_comparison",
            ValuationMethod::IncomeApproach => "income_approach",
            ValuationMethod::CostApproach => "cost_approach",
            ValuationMethod::AutomatedValuation => "automated_valuation",
            ValuationMethod::TaxAssessor => "tax_assessor",
        }
    }
}

impl fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local market conditions at the time of valuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MarketCondition {
    #[default]
    Stable,
    Improving,
    Declining,
    Volatile,
}

impl MarketCondition {
    /// Extra band width for market uncertainty
    pub fn band_adjustment(&self) -> Decimal {
        match self {
            MarketCondition::Stable => dec!(0),
            MarketCondition::Improving => dec!(0.05),
            MarketCondition::Declining => dec!(0.08),
            MarketCondition::Volatile => dec!(0.12),
        }
    }

    /// Declining and volatile markets are flagged as risk factors
    pub fn is_unstable(&self) -> bool {
        match self {
            MarketCondition::Stable | MarketCondition::Improving => false,
            MarketCondition::Declining | MarketCondition::Volatile => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCondition::Stable => "stable",
            MarketCondition::Improving => "improving",
            MarketCondition::Declining => "declining",
            MarketCondition::Volatile => "volatile",
        }
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketCondition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stable" => Ok(MarketCondition::Stable),
            "improving" => Ok(MarketCondition::Improving),
            "declining" => Ok(MarketCondition::Declining),
            "volatile" => Ok(MarketCondition::Volatile),
            _ => Err(ValidationError::RangeViolation {
                field: "market_conditions",
                value: s.to_string(),
                expected: "one of stable, improving, declining, volatile".to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MarketCondition {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Letter grade summarizing a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReliabilityGrade {
    A,
    B,
    C,
    D,
}

impl ReliabilityGrade {
    /// Grade a confidence score: A >= 0.8, B >= 0.6, C >= 0.4, else D
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(0.8) {
            ReliabilityGrade::A
        } else if score >= dec!(0.6) {
            ReliabilityGrade::B
        } else if score >= dec!(0.4) {
            ReliabilityGrade::C
        } else {
            ReliabilityGrade::D
        }
    }

    /// A and B grades count as high-quality valuations
    pub fn is_high_quality(&self) -> bool {
        match self {
            ReliabilityGrade::A | ReliabilityGrade::B => true,
            ReliabilityGrade::C | ReliabilityGrade::D => false,
        }
    }
}

impl fmt::Display for ReliabilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ReliabilityGrade::A => "A",
            ReliabilityGrade::B => "B",
            ReliabilityGrade::C => "C",
            ReliabilityGrade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Uncertainty interval around a central value estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Central value estimate
    pub central_estimate: Decimal,
    /// Band half-width as a fraction of the central estimate
    pub confidence_band_pct: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
    /// Overall confidence, 1.0 for the narrowest band down to 0.0 for the widest
    pub confidence_score: Decimal,
    pub reliability_grade: ReliabilityGrade,
    /// Coefficient of variation across all estimates, when there are several
    pub estimate_dispersion: Option<Decimal>,
    pub method_consistency: Decimal,
    pub risk_factors: Vec<String>,
}

impl ConfidenceResult {
    /// Build a result from an externally supplied band and score
    pub fn from_band(
        central_estimate: Decimal,
        band_pct: Decimal,
        confidence_score: Decimal,
    ) -> Result<Self, ValidationError> {
        let central_estimate = ensure_central_estimate("central_estimate", central_estimate)?;
        let band_pct = ensure_within("confidence_band_pct", band_pct, MIN_BAND, MAX_BAND)?;
        let confidence_score = ensure_unit_interval("confidence_score", confidence_score)?;

        let central = round_currency(central_estimate);
        let band = round_rate(band_pct);
        let (lower_bound, upper_bound) = band_bounds(central, band);
        let score = round_rate(confidence_score);

        Ok(Self {
            central_estimate: central,
            confidence_band_pct: band,
            lower_bound,
            upper_bound,
            confidence_score: score,
            reliability_grade: ReliabilityGrade::from_score(score),
            estimate_dispersion: None,
            method_consistency: round_rate(Decimal::ONE),
            risk_factors: Vec::new(),
        })
    }

    /// Attach valuation risk factors
    pub fn with_risk_factors(mut self, risk_factors: Vec<String>) -> Self {
        self.risk_factors = risk_factors;
        self
    }

    /// Whether a value falls inside the band, bounds inclusive
    pub fn contains(&self, value: Decimal) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }

    /// Band width in currency
    pub fn band_amount(&self) -> Decimal {
        self.upper_bound - self.central_estimate
    }
}

/// Positive, at least `MIN_CENTRAL_ESTIMATE`, and no more than the amount ceiling
pub(crate) fn ensure_central_estimate(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    let value = ensure_positive(field, value)?;
    if value < MIN_CENTRAL_ESTIMATE {
        return Err(ValidationError::RangeViolation {
            field,
            value: value.to_string(),
            expected: format!("at least {MIN_CENTRAL_ESTIMATE}"),
        });
    }
    ensure_plausible_amount(field, value)
}

/// Lower and upper bound in cents; the lower bound never goes negative
pub(crate) fn band_bounds(central: Decimal, band: Decimal) -> (Decimal, Decimal) {
    let amount = central * band;
    let lower = round_currency(central - amount).max(round_currency(Decimal::ZERO));
    let upper = round_currency(central + amount);
    (lower, upper)
}
