//! Jurisdiction priors record and its validating builder

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::{
    ensure_at_most, ensure_count_within, ensure_non_negative, ensure_plausible_amount,
    ensure_positive, ensure_unit_interval, ensure_within, ValidationError,
};

const MIN_TIMELINE_DAYS: u32 = 30;
const MAX_TIMELINE_DAYS: u32 = 730;
const MIN_REVALUATION_YEAR: i32 = 1900;
const MAX_REVALUATION_YEAR: i32 = 2100;

/// Historical appeal statistics for a taxing jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JurisdictionPriors {
    jurisdiction_id: String,
    jurisdiction_name: String,
    region: String,
    appeal_success_rate: Decimal,
    average_reduction_pct: Decimal,
    median_reduction_pct: Decimal,
    typical_filing_fee: Decimal,
    typical_attorney_cost: Decimal,
    average_timeline_days: u32,
    cod_target: Decimal,
    reassessment_risk_factor: Decimal,
    uses_market_value: bool,
    assessment_ratio: Decimal,
    last_revaluation_year: Option<i32>,
}

impl JurisdictionPriors {
    /// Start building priors with generic defaults for every statistic
    pub fn builder(
        jurisdiction_id: impl Into<String>,
        jurisdiction_name: impl Into<String>,
        region: impl Into<String>,
    ) -> JurisdictionPriorsBuilder {
        JurisdictionPriorsBuilder {
            jurisdiction_id: jurisdiction_id.into(),
            jurisdiction_name: jurisdiction_name.into(),
            region: region.into(),
            appeal_success_rate: dec!(0.35),
            average_reduction_pct: dec!(0.15),
            median_reduction_pct: dec!(0.12),
            typical_filing_fee: dec!(0),
            typical_attorney_cost: dec!(2500),
            average_timeline_days: 180,
            cod_target: dec!(0.10),
            reassessment_risk_factor: dec!(0.05),
            uses_market_value: true,
            assessment_ratio: dec!(1.0),
            last_revaluation_year: None,
        }
    }

    pub fn jurisdiction_id(&self) -> &str {
        &self.jurisdiction_id
    }

    pub fn jurisdiction_name(&self) -> &str {
        &self.jurisdiction_name
    }

    /// Two-letter upper-case region code
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn appeal_success_rate(&self) -> Decimal {
        self.appeal_success_rate
    }

    /// Average reduction granted on successful appeals (fraction)
    pub fn average_reduction_pct(&self) -> Decimal {
        self.average_reduction_pct
    }

    pub fn median_reduction_pct(&self) -> Decimal {
        self.median_reduction_pct
    }

    pub fn typical_filing_fee(&self) -> Decimal {
        self.typical_filing_fee
    }

    pub fn typical_attorney_cost(&self) -> Decimal {
        self.typical_attorney_cost
    }

    /// Filing fee plus attorney cost
    pub fn typical_total_cost(&self) -> Decimal {
        self.typical_filing_fee + self.typical_attorney_cost
    }

    pub fn average_timeline_days(&self) -> u32 {
        self.average_timeline_days
    }

    /// Coefficient of dispersion tolerated before a ratio counts as unfair
    pub fn cod_target(&self) -> Decimal {
        self.cod_target
    }

    pub fn reassessment_risk_factor(&self) -> Decimal {
        self.reassessment_risk_factor
    }

    pub fn uses_market_value(&self) -> bool {
        self.uses_market_value
    }

    pub fn assessment_ratio(&self) -> Decimal {
        self.assessment_ratio
    }

    pub fn last_revaluation_year(&self) -> Option<i32> {
        self.last_revaluation_year
    }
}

/// Builder for [`JurisdictionPriors`]
#[derive(Debug, Clone)]
pub struct JurisdictionPriorsBuilder {
    jurisdiction_id: String,
    jurisdiction_name: String,
    region: String,
    appeal_success_rate: Decimal,
    average_reduction_pct: Decimal,
    median_reduction_pct: Decimal,
    typical_filing_fee: Decimal,
    typical_attorney_cost: Decimal,
    average_timeline_days: u32,
    cod_target: Decimal,
    reassessment_risk_factor: Decimal,
    uses_market_value: bool,
    assessment_ratio: Decimal,
    last_revaluation_year: Option<i32>,
}

impl JurisdictionPriorsBuilder {
    pub fn with_success_rate(mut self, rate: Decimal) -> Self {
        self.appeal_success_rate = rate;
        self
    }

    pub fn with_average_reduction(mut self, pct: Decimal) -> Self {
        self.average_reduction_pct = pct;
        self
    }

    pub fn with_median_reduction(mut self, pct: Decimal) -> Self {
        self.median_reduction_pct = pct;
        self
    }

    pub fn with_filing_fee(mut self, fee: Decimal) -> Self {
        self.typical_filing_fee = fee;
        self
    }

    pub fn with_attorney_cost(mut self, cost: Decimal) -> Self {
        self.typical_attorney_cost = cost;
        self
    }

    pub fn with_timeline_days(mut self, days: u32) -> Self {
        self.average_timeline_days = days;
        self
    }

    pub fn with_cod_target(mut self, target: Decimal) -> Self {
        self.cod_target = target;
        self
    }

    pub fn with_reassessment_risk(mut self, factor: Decimal) -> Self {
        self.reassessment_risk_factor = factor;
        self
    }

    pub fn with_market_value_basis(mut self, uses_market_value: bool) -> Self {
        self.uses_market_value = uses_market_value;
        self
    }

    pub fn with_assessment_ratio(mut self, ratio: Decimal) -> Self {
        self.assessment_ratio = ratio;
        self
    }

    pub fn with_last_revaluation_year(mut self, year: Option<i32>) -> Self {
        self.last_revaluation_year = year;
        self
    }

    /// Validate every field and produce the immutable record
    pub fn build(self) -> Result<JurisdictionPriors, ValidationError> {
        let region = normalize_region(&self.region)?;

        let appeal_success_rate =
            ensure_unit_interval("appeal_success_rate", self.appeal_success_rate)?;
        let average_reduction_pct =
            ensure_unit_interval("average_reduction_pct", self.average_reduction_pct)?;
        let median_reduction_pct =
            ensure_unit_interval("median_reduction_pct", self.median_reduction_pct)?;
        let typical_filing_fee = ensure_non_negative("typical_filing_fee", self.typical_filing_fee)?;
        let typical_filing_fee = ensure_plausible_amount("typical_filing_fee", typical_filing_fee)?;
        let typical_attorney_cost =
            ensure_non_negative("typical_attorney_cost", self.typical_attorney_cost)?;
        let typical_attorney_cost =
            ensure_plausible_amount("typical_attorney_cost", typical_attorney_cost)?;
        let average_timeline_days = ensure_count_within(
            "average_timeline_days",
            self.average_timeline_days,
            MIN_TIMELINE_DAYS,
            MAX_TIMELINE_DAYS,
        )?;

        let cod_target = ensure_positive("cod_target", self.cod_target)?;
        let cod_target = ensure_at_most(
            "cod_target",
            cod_target,
            dec!(0.50),
            "dispersion target above 50%",
        )?;

        let reassessment_risk_factor =
            ensure_unit_interval("reassessment_risk_factor", self.reassessment_risk_factor)?;

        let assessment_ratio = ensure_positive("assessment_ratio", self.assessment_ratio)?;
        let assessment_ratio =
            ensure_within("assessment_ratio", assessment_ratio, Decimal::ZERO, Decimal::ONE)?;

        if let Some(year) = self.last_revaluation_year {
            ensure_count_within(
                "last_revaluation_year",
                year,
                MIN_REVALUATION_YEAR,
                MAX_REVALUATION_YEAR,
            )?;
        }

        Ok(JurisdictionPriors {
            jurisdiction_id: self.jurisdiction_id,
            jurisdiction_name: self.jurisdiction_name,
            region,
            appeal_success_rate,
            average_reduction_pct,
            median_reduction_pct,
            typical_filing_fee,
            typical_attorney_cost,
            average_timeline_days,
            cod_target,
            reassessment_risk_factor,
            uses_market_value: self.uses_market_value,
            assessment_ratio,
            last_revaluation_year: self.last_revaluation_year,
        })
    }
}

/// Upper-case a two-letter alphabetic region code
pub(crate) fn normalize_region(region: &str) -> Result<String, ValidationError> {
    let trimmed = region.trim();
    if trimmed.chars().count() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::RangeViolation {
            field: "region",
            value: region.to_string(),
            expected: "two-letter code such as TX or CA".to_string(),
        });
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Conservative priors for a region without historical appeal data
pub fn default_priors(region: &str) -> Result<JurisdictionPriors, ValidationError> {
    let region = normalize_region(region)?;

    JurisdictionPriors::builder(
        format!("default_{}", region.to_ascii_lowercase()),
        format!("Default {region} Jurisdiction"),
        region,
    )
    .with_success_rate(dec!(0.30))
    .with_average_reduction(dec!(0.12))
    .with_median_reduction(dec!(0.10))
    .with_filing_fee(dec!(500))
    .with_attorney_cost(dec!(3000))
    .with_timeline_days(180)
    .with_cod_target(dec!(0.10))
    .with_reassessment_risk(dec!(0.05))
    .with_market_value_basis(true)
    .with_assessment_ratio(dec!(1.0))
    .with_last_revaluation_year(None)
    .build()
}
