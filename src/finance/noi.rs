//! Net operating income for income-producing property

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_at_most, ensure_non_negative, ensure_unit_interval, ValidationError};
use crate::money::round_currency;

const DEFAULT_VACANCY_RATE: Decimal = dec!(0.05);
const MAX_VACANCY_RATE: Decimal = dec!(0.5);

/// Annual operating expenses by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingExpenses {
    pub property_taxes: Decimal,
    pub insurance: Decimal,
    pub maintenance: Decimal,
    pub utilities: Decimal,
    pub management_fees: Decimal,
    pub other: Decimal,
}

impl OperatingExpenses {
    pub fn total(&self) -> Decimal {
        self.property_taxes
            + self.insurance
            + self.maintenance
            + self.utilities
            + self.management_fees
            + self.other
    }

    fn validate(self) -> Result<Self, ValidationError> {
        ensure_non_negative("property_taxes", self.property_taxes)?;
        ensure_non_negative("insurance", self.insurance)?;
        ensure_non_negative("maintenance", self.maintenance)?;
        ensure_non_negative("utilities", self.utilities)?;
        ensure_non_negative("management_fees", self.management_fees)?;
        ensure_non_negative("other_expenses", self.other)?;
        Ok(self)
    }

    fn rounded(&self) -> Self {
        Self {
            property_taxes: round_currency(self.property_taxes),
            insurance: round_currency(self.insurance),
            maintenance: round_currency(self.maintenance),
            utilities: round_currency(self.utilities),
            management_fees: round_currency(self.management_fees),
            other: round_currency(self.other),
        }
    }
}

/// Validated NOI input
#[derive(Debug, Clone, PartialEq)]
pub struct NoiInput {
    gross_rental_income: Decimal,
    vacancy_rate: Decimal,
    other_income: Decimal,
    expenses: OperatingExpenses,
}

impl NoiInput {
    pub fn new(gross_rental_income: Decimal) -> Result<Self, ValidationError> {
        Ok(Self {
            gross_rental_income: ensure_non_negative("gross_rental_income", gross_rental_income)?,
            vacancy_rate: DEFAULT_VACANCY_RATE,
            other_income: Decimal::ZERO,
            expenses: OperatingExpenses::default(),
        })
    }

    pub fn with_vacancy_rate(mut self, rate: Decimal) -> Result<Self, ValidationError> {
        let rate = ensure_unit_interval("vacancy_rate", rate)?;
        self.vacancy_rate = ensure_at_most("vacancy_rate", rate, MAX_VACANCY_RATE, "vacancy above 50%")?;
        Ok(self)
    }

    pub fn with_other_income(mut self, income: Decimal) -> Result<Self, ValidationError> {
        self.other_income = ensure_non_negative("other_income", income)?;
        Ok(self)
    }

    pub fn with_expenses(mut self, expenses: OperatingExpenses) -> Result<Self, ValidationError> {
        self.expenses = expenses.validate()?;
        Ok(self)
    }

    pub fn vacancy_rate(&self) -> Decimal {
        self.vacancy_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiResult {
    pub effective_gross_income: Decimal,
    pub total_operating_expenses: Decimal,
    pub net_operating_income: Decimal,
    pub vacancy_loss: Decimal,
    pub expense_breakdown: OperatingExpenses,
}

/// Compute EGI, expenses and NOI
///
/// Fails when expenses exceed twice the effective gross income, which points
/// at a data entry problem rather than a real operating loss.
pub fn calculate_noi(input: &NoiInput) -> Result<NoiResult, ValidationError> {
    let vacancy_loss = input.gross_rental_income * input.vacancy_rate;
    let effective_gross_income = input.gross_rental_income - vacancy_loss + input.other_income;
    let total_expenses = input.expenses.total();
    let noi = effective_gross_income - total_expenses;

    if noi < -effective_gross_income {
        return Err(ValidationError::UnreasonableValue {
            field: "operating_expenses",
            value: total_expenses.to_string(),
            reason: "expenses exceed 200% of effective gross income",
        });
    }

    Ok(NoiResult {
        effective_gross_income: round_currency(effective_gross_income),
        total_operating_expenses: round_currency(total_expenses),
        net_operating_income: round_currency(noi),
        vacancy_loss: round_currency(vacancy_loss),
        expense_breakdown: input.expenses.rounded(),
    })
}
