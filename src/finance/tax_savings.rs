//! Tax savings projection for a change in assessed value

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_at_most, ensure_count_within, ensure_non_negative, ensure_plausible_amount,
    ensure_positive, ValidationError,
};
use crate::money::{round_currency, round_percent};

/// Highest effective tax rate accepted as a fraction of value
pub const MAX_EFFECTIVE_RATE: Decimal = dec!(0.10);
const MAX_PER_THOUSAND: Decimal = dec!(200);
const MAX_HORIZON_YEARS: u32 = 10;

/// How a tax rate is quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRateBasis {
    /// Fraction of assessed value (0.025 = 2.5%)
    #[default]
    Fraction,
    /// Dollars per $1000 of assessed value
    PerThousand,
    /// Mills; one mill is $1 per $1000
    Mills,
}

/// A validated tax rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate {
    rate: Decimal,
    basis: TaxRateBasis,
}

impl TaxRate {
    pub fn new(rate: Decimal, basis: TaxRateBasis) -> Result<Self, ValidationError> {
        let rate = ensure_positive("tax_rate", rate)?;
        match basis {
            TaxRateBasis::Fraction => {
                ensure_at_most("tax_rate", rate, MAX_EFFECTIVE_RATE, "tax rate above 10%")?;
            }
            TaxRateBasis::PerThousand => {
                ensure_at_most("tax_rate", rate, MAX_PER_THOUSAND, "more than $200 per $1000")?;
            }
            TaxRateBasis::Mills => {
                ensure_at_most("tax_rate", rate, MAX_PER_THOUSAND, "more than 200 mills")?;
            }
        }
        Ok(Self { rate, basis })
    }

    pub fn fraction(rate: Decimal) -> Result<Self, ValidationError> {
        Self::new(rate, TaxRateBasis::Fraction)
    }

    /// Rate as a fraction of assessed value
    pub fn effective(&self) -> Decimal {
        match self.basis {
            TaxRateBasis::Fraction => self.rate,
            TaxRateBasis::PerThousand | TaxRateBasis::Mills => self.rate / dec!(1000),
        }
    }

    pub fn basis(&self) -> TaxRateBasis {
        self.basis
    }
}

/// Unrounded savings arithmetic shared by the calculator and the decision engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProjection {
    pub annual_tax_current: Decimal,
    pub annual_tax_proposed: Decimal,
    pub annual_savings: Decimal,
    pub total_costs: Decimal,
    pub years: u32,
}

impl SavingsProjection {
    /// Project savings of moving from `current` to `proposed` assessed value
    pub fn new(
        current: Decimal,
        proposed: Decimal,
        effective_rate: Decimal,
        total_costs: Decimal,
        years: u32,
    ) -> Self {
        let annual_tax_current = current * effective_rate;
        let annual_tax_proposed = proposed * effective_rate;
        Self {
            annual_tax_current,
            annual_tax_proposed,
            annual_savings: annual_tax_current - annual_tax_proposed,
            total_costs,
            years,
        }
    }

    /// Savings over the whole horizon before costs
    pub fn total_benefit(&self) -> Decimal {
        self.annual_savings * Decimal::from(self.years)
    }

    pub fn net_first_year(&self) -> Decimal {
        self.annual_savings - self.total_costs
    }

    /// Horizon savings net of costs
    pub fn cumulative_net(&self) -> Decimal {
        self.total_benefit() - self.total_costs
    }

    /// Return on costs in percent; undefined without costs
    pub fn roi_pct(&self) -> Option<Decimal> {
        if self.total_costs <= Decimal::ZERO {
            return None;
        }
        let net = self.total_benefit() - self.total_costs;
        let roi = net
            .checked_div(self.total_costs)
            .and_then(|multiple| multiple.checked_mul(dec!(100)));
        // Fractions of a cent in costs can push the multiple out of range
        Some(roi.unwrap_or(if net.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }))
    }

    /// Years until savings recoup costs
    pub fn payback_years(&self) -> Option<Decimal> {
        if self.annual_savings <= Decimal::ZERO || self.total_costs <= Decimal::ZERO {
            return None;
        }
        self.total_costs.checked_div(self.annual_savings)
    }
}

/// Validated inputs for a standalone savings calculation
#[derive(Debug, Clone)]
pub struct TaxSavingsInput {
    current_assessed_value: Decimal,
    proposed_assessed_value: Decimal,
    tax_rate: TaxRate,
    filing_fee: Decimal,
    attorney_fee: Decimal,
    other_costs: Decimal,
    years_of_savings: u32,
}

impl TaxSavingsInput {
    pub fn new(
        current_assessed_value: Decimal,
        proposed_assessed_value: Decimal,
        tax_rate: TaxRate,
    ) -> Result<Self, ValidationError> {
        let current_assessed_value =
            ensure_positive("current_assessed_value", current_assessed_value)?;
        let proposed_assessed_value =
            ensure_positive("proposed_assessed_value", proposed_assessed_value)?;
        Ok(Self {
            current_assessed_value: ensure_plausible_amount(
                "current_assessed_value",
                current_assessed_value,
            )?,
            proposed_assessed_value: ensure_plausible_amount(
                "proposed_assessed_value",
                proposed_assessed_value,
            )?,
            tax_rate,
            filing_fee: Decimal::ZERO,
            attorney_fee: Decimal::ZERO,
            other_costs: Decimal::ZERO,
            years_of_savings: 1,
        })
    }

    pub fn with_costs(
        mut self,
        filing_fee: Decimal,
        attorney_fee: Decimal,
        other_costs: Decimal,
    ) -> Result<Self, ValidationError> {
        for (field, amount) in [
            ("filing_fee", filing_fee),
            ("attorney_fee", attorney_fee),
            ("other_costs", other_costs),
        ] {
            ensure_non_negative(field, amount)?;
            ensure_plausible_amount(field, amount)?;
        }
        self.filing_fee = filing_fee;
        self.attorney_fee = attorney_fee;
        self.other_costs = other_costs;
        Ok(self)
    }

    pub fn with_years(mut self, years: u32) -> Result<Self, ValidationError> {
        self.years_of_savings = ensure_count_within("years_of_savings", years, 1, MAX_HORIZON_YEARS)?;
        Ok(self)
    }
}

/// Rounded savings report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSavingsResult {
    pub annual_tax_current: Decimal,
    pub annual_tax_proposed: Decimal,
    pub annual_savings: Decimal,
    pub total_appeal_costs: Decimal,
    pub net_first_year_savings: Decimal,
    pub cumulative_savings: Decimal,
    pub payback_period_years: Option<Decimal>,
    pub roi_percentage: Option<Decimal>,
    /// Proposed value is above the current one
    pub value_increase_warning: bool,
    /// The change would raise taxes
    pub negative_savings_warning: bool,
}

pub fn calculate_tax_savings(input: &TaxSavingsInput) -> TaxSavingsResult {
    let total_costs = input.filing_fee + input.attorney_fee + input.other_costs;
    let projection = SavingsProjection::new(
        input.current_assessed_value,
        input.proposed_assessed_value,
        input.tax_rate.effective(),
        total_costs,
        input.years_of_savings,
    );

    TaxSavingsResult {
        annual_tax_current: round_currency(projection.annual_tax_current),
        annual_tax_proposed: round_currency(projection.annual_tax_proposed),
        annual_savings: round_currency(projection.annual_savings),
        total_appeal_costs: round_currency(total_costs),
        net_first_year_savings: round_currency(projection.net_first_year()),
        cumulative_savings: round_currency(projection.cumulative_net()),
        payback_period_years: projection.payback_years().map(round_currency),
        roi_percentage: projection.roi_pct().map(round_percent),
        value_increase_warning: input.proposed_assessed_value > input.current_assessed_value,
        negative_savings_warning: projection.annual_savings < Decimal::ZERO,
    }
}
