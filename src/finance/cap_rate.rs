//! Capitalization rate arithmetic
//!
//! Cap rate = NOI / value, and value = NOI / cap rate. A calculation is driven
//! by exactly one of the two.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_at_most, ensure_positive, ValidationError};
use crate::money::{round_currency, round_places};

/// Which side of the cap rate identity is known
#[derive(Debug, Clone, Copy, PartialEq)]
enum CapRateTarget {
    PropertyValue(Decimal),
    TargetRate(Decimal),
}

/// Validated cap rate calculation input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapRateInput {
    net_operating_income: Decimal,
    target: CapRateTarget,
}

impl CapRateInput {
    /// Derive the cap rate from a known property value
    pub fn from_value(
        net_operating_income: Decimal,
        property_value: Decimal,
    ) -> Result<Self, ValidationError> {
        Self::from_options(net_operating_income, Some(property_value), None)
    }

    /// Derive the implied value from a target cap rate
    pub fn from_target_rate(
        net_operating_income: Decimal,
        target_cap_rate: Decimal,
    ) -> Result<Self, ValidationError> {
        Self::from_options(net_operating_income, None, Some(target_cap_rate))
    }

    /// Accept either alternative; supplying both or neither is an error
    pub fn from_options(
        net_operating_income: Decimal,
        property_value: Option<Decimal>,
        target_cap_rate: Option<Decimal>,
    ) -> Result<Self, ValidationError> {
        let target = match (property_value, target_cap_rate) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::MutualExclusionViolation {
                    first: "property_value",
                    second: "target_cap_rate",
                    detail: "both were supplied",
                })
            }
            (None, None) => {
                return Err(ValidationError::MutualExclusionViolation {
                    first: "property_value",
                    second: "target_cap_rate",
                    detail: "neither was supplied",
                })
            }
            (Some(value), None) => {
                CapRateTarget::PropertyValue(ensure_positive("property_value", value)?)
            }
            (None, Some(rate)) => {
                let rate = ensure_positive("target_cap_rate", rate)?;
                CapRateTarget::TargetRate(ensure_at_most(
                    "target_cap_rate",
                    rate,
                    dec!(0.5),
                    "cap rate above 50%",
                )?)
            }
        };

        Ok(Self {
            net_operating_income,
            target,
        })
    }
}

/// Reasonableness band for a computed cap rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapRateQuality {
    NegativeNoi,
    VeryLow,
    Low,
    Reasonable,
    High,
    VeryHigh,
    CalculatedValue,
}

impl fmt::Display for CapRateQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CapRateQuality::NegativeNoi => "NEGATIVE_NOI",
            CapRateQuality::VeryLow => "VERY_LOW",
            CapRateQuality::Low => "LOW",
            CapRateQuality::Reasonable => "REASONABLE",
            CapRateQuality::High => "HIGH",
            CapRateQuality::VeryHigh => "VERY_HIGH",
            CapRateQuality::CalculatedValue => "CALCULATED_VALUE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapRateResult {
    pub cap_rate: Option<Decimal>,
    pub implied_value: Option<Decimal>,
    pub noi_used: Decimal,
    pub negative_noi_warning: bool,
    pub cap_rate_quality: CapRateQuality,
}

pub fn calculate_cap_rate(input: &CapRateInput) -> CapRateResult {
    let noi = input.net_operating_income;
    let negative_noi = noi < Decimal::ZERO;

    match input.target {
        CapRateTarget::PropertyValue(value) => {
            let cap_rate = noi / value;
            CapRateResult {
                cap_rate: Some(round_places(cap_rate, 4)),
                implied_value: None,
                noi_used: round_currency(noi),
                negative_noi_warning: negative_noi,
                cap_rate_quality: grade_cap_rate(cap_rate, negative_noi),
            }
        }
        CapRateTarget::TargetRate(rate) => CapRateResult {
            cap_rate: None,
            implied_value: Some(round_currency(noi / rate)),
            noi_used: round_currency(noi),
            negative_noi_warning: negative_noi,
            cap_rate_quality: if negative_noi {
                CapRateQuality::NegativeNoi
            } else {
                CapRateQuality::CalculatedValue
            },
        },
    }
}

fn grade_cap_rate(cap_rate: Decimal, negative_noi: bool) -> CapRateQuality {
    if negative_noi {
        CapRateQuality::NegativeNoi
    } else if cap_rate < dec!(0.02) {
        CapRateQuality::VeryLow
    } else if cap_rate < dec!(0.04) {
        CapRateQuality::Low
    } else if cap_rate <= dec!(0.12) {
        CapRateQuality::Reasonable
    } else if cap_rate <= dec!(0.20) {
        CapRateQuality::High
    } else {
        CapRateQuality::VeryHigh
    }
}
