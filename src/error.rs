//! Validation errors raised while constructing engine inputs
//!
//! Every input type is validated when it is built. The algorithms themselves
//! never fail, so this is the only error type the domain modules return.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::MAX_AMOUNT;

/// Input validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A bounded field fell outside its documented range
    #[error("{field} out of range: {value} (expected {expected})")]
    RangeViolation {
        field: &'static str,
        value: String,
        expected: String,
    },
    /// A monetary or count field had the wrong sign
    #[error("{field} must be {requirement}, got {value}")]
    SignViolation {
        field: &'static str,
        value: String,
        requirement: &'static str,
    },
    /// Two alternative inputs were supplied together (or neither was)
    #[error("provide exactly one of {first} or {second}: {detail}")]
    MutualExclusionViolation {
        first: &'static str,
        second: &'static str,
        detail: &'static str,
    },
    /// A value that is in range but not plausible
    #[error("{field} seems unreasonable: {value} ({reason})")]
    UnreasonableValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::RangeViolation { field, .. }
            | ValidationError::SignViolation { field, .. }
            | ValidationError::UnreasonableValue { field, .. } => field,
            ValidationError::MutualExclusionViolation { first, .. } => first,
        }
    }

    /// Short machine-friendly label for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::RangeViolation { .. } => "range_violation",
            ValidationError::SignViolation { .. } => "sign_violation",
            ValidationError::MutualExclusionViolation { .. } => "mutual_exclusion_violation",
            ValidationError::UnreasonableValue { .. } => "unreasonable_value",
        }
    }
}

/// Require `min <= value <= max`
pub(crate) fn ensure_within(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<Decimal, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::RangeViolation {
            field,
            value: value.to_string(),
            expected: format!("[{min}, {max}]"),
        });
    }
    Ok(value)
}

/// Require a fraction in `[0, 1]`
pub(crate) fn ensure_unit_interval(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    ensure_within(field, value, Decimal::ZERO, Decimal::ONE)
}

/// Require an integer count within `[min, max]`
pub(crate) fn ensure_count_within<T>(
    field: &'static str,
    value: T,
    min: T,
    max: T,
) -> Result<T, ValidationError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::RangeViolation {
            field,
            value: value.to_string(),
            expected: format!("[{min}, {max}]"),
        });
    }
    Ok(value)
}

/// Require `value > 0`
pub(crate) fn ensure_positive(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::SignViolation {
            field,
            value: value.to_string(),
            requirement: "positive",
        });
    }
    Ok(value)
}

/// Require `value >= 0`
pub(crate) fn ensure_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::SignViolation {
            field,
            value: value.to_string(),
            requirement: "non-negative",
        });
    }
    Ok(value)
}

/// Reject values above a plausibility ceiling
pub(crate) fn ensure_at_most(
    field: &'static str,
    value: Decimal,
    ceiling: Decimal,
    reason: &'static str,
) -> Result<Decimal, ValidationError> {
    if value > ceiling {
        return Err(ValidationError::UnreasonableValue {
            field,
            value: value.to_string(),
            reason,
        });
    }
    Ok(value)
}

/// Reject monetary amounts beyond any real property value
pub(crate) fn ensure_plausible_amount(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    ensure_at_most(field, value, MAX_AMOUNT, "above one quadrillion")
}
