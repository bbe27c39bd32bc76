//! Validated decision engine input

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::confidence::{ensure_central_estimate, ConfidenceResult, MAX_BAND, MIN_BAND};
use crate::error::{
    ensure_at_most, ensure_count_within, ensure_non_negative, ensure_plausible_amount,
    ensure_positive, ensure_unit_interval, ensure_within, ValidationError,
};
use crate::finance::MAX_EFFECTIVE_RATE;
use crate::jurisdiction::JurisdictionPriors;

pub const DEFAULT_MIN_ROI_THRESHOLD: Decimal = dec!(2.0);
pub const DEFAULT_MIN_SAVINGS_THRESHOLD: Decimal = dec!(1000);
pub const DEFAULT_HORIZON_YEARS: u32 = 3;
pub const MAX_HORIZON_YEARS: u32 = 10;

/// Everything the engine needs to classify one property
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionInput {
    assessed_value: Decimal,
    estimated_market_value: Decimal,
    confidence: ConfidenceResult,
    priors: JurisdictionPriors,
    tax_rate: Decimal,
    filing_fee: Option<Decimal>,
    attorney_fee: Option<Decimal>,
    other_costs: Option<Decimal>,
    min_roi_threshold: Decimal,
    min_savings_threshold: Decimal,
    horizon_years: u32,
}

impl DecisionInput {
    /// Start a builder; `tax_rate` is the effective rate as a fraction
    pub fn builder(
        assessed_value: Decimal,
        estimated_market_value: Decimal,
        confidence: ConfidenceResult,
        priors: JurisdictionPriors,
        tax_rate: Decimal,
    ) -> DecisionInputBuilder {
        DecisionInputBuilder {
            assessed_value,
            estimated_market_value,
            confidence,
            priors,
            tax_rate,
            filing_fee: None,
            attorney_fee: None,
            other_costs: None,
            min_roi_threshold: DEFAULT_MIN_ROI_THRESHOLD,
            min_savings_threshold: DEFAULT_MIN_SAVINGS_THRESHOLD,
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }

    pub fn assessed_value(&self) -> Decimal {
        self.assessed_value
    }

    pub fn estimated_market_value(&self) -> Decimal {
        self.estimated_market_value
    }

    pub fn confidence(&self) -> &ConfidenceResult {
        &self.confidence
    }

    pub fn priors(&self) -> &JurisdictionPriors {
        &self.priors
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// ROI multiple an appeal must beat (2.0 = 200%)
    pub fn min_roi_threshold(&self) -> Decimal {
        self.min_roi_threshold
    }

    pub fn min_savings_threshold(&self) -> Decimal {
        self.min_savings_threshold
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    /// Appeal costs, or the jurisdiction's typical costs when none were given
    pub fn total_costs(&self) -> Decimal {
        if self.filing_fee.is_none() && self.attorney_fee.is_none() && self.other_costs.is_none()
        {
            return self.priors.typical_total_cost();
        }
        self.filing_fee.unwrap_or_default()
            + self.attorney_fee.unwrap_or_default()
            + self.other_costs.unwrap_or_default()
    }
}

/// Builder for [`DecisionInput`]
#[derive(Debug, Clone)]
pub struct DecisionInputBuilder {
    assessed_value: Decimal,
    estimated_market_value: Decimal,
    confidence: ConfidenceResult,
    priors: JurisdictionPriors,
    tax_rate: Decimal,
    filing_fee: Option<Decimal>,
    attorney_fee: Option<Decimal>,
    other_costs: Option<Decimal>,
    min_roi_threshold: Decimal,
    min_savings_threshold: Decimal,
    horizon_years: u32,
}

impl DecisionInputBuilder {
    pub fn with_filing_fee(mut self, fee: Decimal) -> Self {
        self.filing_fee = Some(fee);
        self
    }

    pub fn with_attorney_fee(mut self, fee: Decimal) -> Self {
        self.attorney_fee = Some(fee);
        self
    }

    pub fn with_other_costs(mut self, costs: Decimal) -> Self {
        self.other_costs = Some(costs);
        self
    }

    /// Set whichever costs are known, leaving the rest unset
    pub fn with_costs(
        mut self,
        filing_fee: Option<Decimal>,
        attorney_fee: Option<Decimal>,
        other_costs: Option<Decimal>,
    ) -> Self {
        self.filing_fee = filing_fee.or(self.filing_fee);
        self.attorney_fee = attorney_fee.or(self.attorney_fee);
        self.other_costs = other_costs.or(self.other_costs);
        self
    }

    pub fn with_min_roi_threshold(mut self, multiple: Decimal) -> Self {
        self.min_roi_threshold = multiple;
        self
    }

    pub fn with_min_savings_threshold(mut self, amount: Decimal) -> Self {
        self.min_savings_threshold = amount;
        self
    }

    pub fn with_horizon_years(mut self, years: u32) -> Self {
        self.horizon_years = years;
        self
    }

    pub fn build(self) -> Result<DecisionInput, ValidationError> {
        let assessed_value = ensure_positive("assessed_value", self.assessed_value)?;
        let assessed_value = ensure_plausible_amount("assessed_value", assessed_value)?;
        let estimated_market_value =
            ensure_central_estimate("estimated_market_value", self.estimated_market_value)?;

        let tax_rate = ensure_positive("tax_rate", self.tax_rate)?;
        let tax_rate = ensure_at_most("tax_rate", tax_rate, MAX_EFFECTIVE_RATE, "tax rate above 10%")?;

        let filing_fee = self
            .filing_fee
            .map(|fee| ensure_cost("estimated_filing_fee", fee))
            .transpose()?;
        let attorney_fee = self
            .attorney_fee
            .map(|fee| ensure_cost("estimated_attorney_fee", fee))
            .transpose()?;
        let other_costs = self
            .other_costs
            .map(|cost| ensure_cost("estimated_other_costs", cost))
            .transpose()?;

        let min_roi_threshold = ensure_positive("min_roi_threshold", self.min_roi_threshold)?;
        let min_roi_threshold = ensure_plausible_amount("min_roi_threshold", min_roi_threshold)?;
        let min_savings_threshold =
            ensure_non_negative("min_savings_threshold", self.min_savings_threshold)?;
        let min_savings_threshold =
            ensure_plausible_amount("min_savings_threshold", min_savings_threshold)?;
        let horizon_years = ensure_count_within(
            "appeal_horizon_years",
            self.horizon_years,
            1,
            MAX_HORIZON_YEARS,
        )?;

        // Results can arrive deserialized, so the band is checked here too
        ensure_within(
            "confidence_band_pct",
            self.confidence.confidence_band_pct,
            MIN_BAND,
            MAX_BAND,
        )?;
        ensure_unit_interval("confidence_score", self.confidence.confidence_score)?;
        if self.confidence.lower_bound >= self.confidence.upper_bound {
            return Err(ValidationError::RangeViolation {
                field: "confidence_result",
                value: format!(
                    "[{}, {}]",
                    self.confidence.lower_bound, self.confidence.upper_bound
                ),
                expected: "lower_bound < upper_bound".to_string(),
            });
        }

        Ok(DecisionInput {
            assessed_value,
            estimated_market_value,
            confidence: self.confidence,
            priors: self.priors,
            tax_rate,
            filing_fee,
            attorney_fee,
            other_costs,
            min_roi_threshold,
            min_savings_threshold,
            horizon_years,
        })
    }
}

fn ensure_cost(field: &'static str, amount: Decimal) -> Result<Decimal, ValidationError> {
    ensure_non_negative(field, amount).and_then(|amount| ensure_plausible_amount(field, amount))
}
