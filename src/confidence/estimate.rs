//! Valuation estimate input and its builder

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{ensure_central_estimate, MarketCondition, ValuationMethod};
use crate::error::{
    ensure_count_within, ensure_plausible_amount, ensure_positive, ensure_unit_interval,
    ValidationError,
};

/// Oldest valuation the calculator accepts (three years)
pub const MAX_VALUATION_AGE_DAYS: u32 = 1095;
/// Cap on supplementary estimates from other methods
pub const MAX_OTHER_ESTIMATES: usize = 10;

/// A validated market value estimate with its reliability metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationEstimate {
    estimated_market_value: Decimal,
    method: ValuationMethod,
    comparable_sales: Vec<Decimal>,
    other_estimates: Vec<(Decimal, ValuationMethod)>,
    data_quality_score: Decimal,
    market_condition: MarketCondition,
    property_uniqueness: Decimal,
    days_since_valuation: u32,
}

impl ValuationEstimate {
    /// Start building an estimate with default quality metadata
    pub fn builder(estimated_market_value: Decimal, method: ValuationMethod) -> ValuationEstimateBuilder {
        ValuationEstimateBuilder {
            estimated_market_value,
            method,
            comparable_sales: Vec::new(),
            other_estimates: Vec::new(),
            data_quality_score: dec!(0.8),
            market_condition: MarketCondition::Stable,
            property_uniqueness: dec!(0.5),
            days_since_valuation: None,
            valuation_dates: None,
        }
    }

    pub fn estimated_market_value(&self) -> Decimal {
        self.estimated_market_value
    }

    pub fn method(&self) -> ValuationMethod {
        self.method
    }

    pub fn comparable_sales(&self) -> &[Decimal] {
        &self.comparable_sales
    }

    pub fn other_estimates(&self) -> &[(Decimal, ValuationMethod)] {
        &self.other_estimates
    }

    pub fn data_quality_score(&self) -> Decimal {
        self.data_quality_score
    }

    pub fn market_condition(&self) -> MarketCondition {
        self.market_condition
    }

    pub fn property_uniqueness(&self) -> Decimal {
        self.property_uniqueness
    }

    pub fn days_since_valuation(&self) -> u32 {
        self.days_since_valuation
    }

    /// Central estimate followed by every comparable and other estimate
    pub fn all_estimates(&self) -> Vec<Decimal> {
        std::iter::once(self.estimated_market_value)
            .chain(self.comparable_sales.iter().copied())
            .chain(self.other_estimates.iter().map(|(value, _)| *value))
            .collect()
    }
}

/// Builder for [`ValuationEstimate`]
#[derive(Debug, Clone)]
pub struct ValuationEstimateBuilder {
    estimated_market_value: Decimal,
    method: ValuationMethod,
    comparable_sales: Vec<Decimal>,
    other_estimates: Vec<(Decimal, ValuationMethod)>,
    data_quality_score: Decimal,
    market_condition: MarketCondition,
    property_uniqueness: Decimal,
    days_since_valuation: Option<u32>,
    valuation_dates: Option<(NaiveDate, NaiveDate)>,
}

impl ValuationEstimateBuilder {
    pub fn with_comparables(mut self, sales: impl IntoIterator<Item = Decimal>) -> Self {
        self.comparable_sales.extend(sales);
        self
    }

    pub fn with_other_estimate(mut self, value: Decimal, method: ValuationMethod) -> Self {
        self.other_estimates.push((value, method));
        self
    }

    pub fn with_other_estimates(
        mut self,
        estimates: impl IntoIterator<Item = (Decimal, ValuationMethod)>,
    ) -> Self {
        self.other_estimates.extend(estimates);
        self
    }

    pub fn with_data_quality(mut self, score: Decimal) -> Self {
        self.data_quality_score = score;
        self
    }

    pub fn with_market_condition(mut self, condition: MarketCondition) -> Self {
        self.market_condition = condition;
        self
    }

    pub fn with_uniqueness(mut self, score: Decimal) -> Self {
        self.property_uniqueness = score;
        self
    }

    /// Age of the valuation in days
    pub fn with_days_since_valuation(mut self, days: u32) -> Self {
        self.days_since_valuation = Some(days);
        self
    }

    /// Derive the valuation age from its date, measured at `as_of`
    pub fn with_valuation_date(mut self, valuation_date: NaiveDate, as_of: NaiveDate) -> Self {
        self.valuation_dates = Some((valuation_date, as_of));
        self
    }

    pub fn build(self) -> Result<ValuationEstimate, ValidationError> {
        let estimated_market_value =
            ensure_central_estimate("estimated_market_value", self.estimated_market_value)?;

        for sale in &self.comparable_sales {
            ensure_positive("comparable_sales", *sale)?;
            ensure_plausible_amount("comparable_sales", *sale)?;
        }

        ensure_count_within(
            "other_estimates",
            self.other_estimates.len(),
            0,
            MAX_OTHER_ESTIMATES,
        )?;
        for (value, _) in &self.other_estimates {
            ensure_positive("other_estimates", *value)?;
            ensure_plausible_amount("other_estimates", *value)?;
        }

        let data_quality_score = ensure_unit_interval("data_quality_score", self.data_quality_score)?;
        let property_uniqueness =
            ensure_unit_interval("property_uniqueness", self.property_uniqueness)?;

        let days = match (self.days_since_valuation, self.valuation_dates) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::MutualExclusionViolation {
                    first: "days_since_valuation",
                    second: "valuation_date",
                    detail: "the valuation age is derived from one or the other",
                })
            }
            (Some(days), None) => days,
            (None, Some((valuation_date, as_of))) => age_in_days(valuation_date, as_of)?,
            (None, None) => 0,
        };
        let days_since_valuation =
            ensure_count_within("days_since_valuation", days, 0, MAX_VALUATION_AGE_DAYS)?;

        Ok(ValuationEstimate {
            estimated_market_value,
            method: self.method,
            comparable_sales: self.comparable_sales,
            other_estimates: self.other_estimates,
            data_quality_score,
            market_condition: self.market_condition,
            property_uniqueness,
            days_since_valuation,
        })
    }
}

fn age_in_days(valuation_date: NaiveDate, as_of: NaiveDate) -> Result<u32, ValidationError> {
    let days = (as_of - valuation_date).num_days();
    if days < 0 {
        return Err(ValidationError::RangeViolation {
            field: "valuation_date",
            value: valuation_date.to_string(),
            expected: format!("on or before {as_of}"),
        });
    }
    u32::try_from(days).map_err(|_| ValidationError::RangeViolation {
        field: "valuation_date",
        value: valuation_date.to_string(),
        expected: format!("within {MAX_VALUATION_AGE_DAYS} days of {as_of}"),
    })
}
