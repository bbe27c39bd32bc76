//! Per-property evaluation requests and outcomes

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::confidence::{ConfidenceResult, MarketCondition, ValuationMethod};
use crate::decision::DecisionResult;
use crate::finance::TaxRateBasis;

/// One property to evaluate, as read from a request file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PropertyRequest {
    pub property_id: String,
    pub assessed_value: Decimal,
    pub tax_rate: Decimal,
    #[serde(default)]
    pub tax_rate_basis: TaxRateBasis,
    pub region: String,
    #[serde(default)]
    pub jurisdiction_id: Option<String>,
    pub valuation: ValuationRequest,
    /// Income approach cross-check, added as a further value estimate
    #[serde(default)]
    pub income_approach: Option<IncomeApproachRequest>,
    #[serde(default)]
    pub costs: CostRequest,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Market value estimate and its reliability metadata
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValuationRequest {
    pub method: ValuationMethod,
    pub estimated_market_value: Decimal,
    #[serde(default)]
    pub comparable_sales: Vec<Decimal>,
    #[serde(default)]
    pub other_estimates: Vec<OtherEstimate>,
    #[serde(default)]
    pub data_quality_score: Option<Decimal>,
    #[serde(default)]
    pub market_conditions: MarketCondition,
    #[serde(default)]
    pub property_uniqueness: Option<Decimal>,
    #[serde(default)]
    pub days_since_valuation: Option<u32>,
    #[serde(default)]
    pub valuation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct OtherEstimate {
    pub value: Decimal,
    pub method: ValuationMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct IncomeApproachRequest {
    pub net_operating_income: Decimal,
    pub target_cap_rate: Decimal,
}

/// Known appeal costs; leave all unset to use the jurisdiction's typical costs
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct CostRequest {
    #[serde(default)]
    pub filing_fee: Option<Decimal>,
    #[serde(default)]
    pub attorney_fee: Option<Decimal>,
    #[serde(default)]
    pub other_costs: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub min_roi_threshold: Option<Decimal>,
    #[serde(default)]
    pub min_savings_threshold: Option<Decimal>,
    #[serde(default)]
    pub appeal_horizon_years: Option<u32>,
}

/// Confidence band and decision for one property
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PropertyOutcome {
    pub property_id: String,
    pub jurisdiction_id: String,
    pub confidence: ConfidenceResult,
    pub decision: DecisionResult,
}

/// Result for one entry of a portfolio batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PortfolioEntry {
    Evaluated(PropertyOutcome),
    Rejected {
        property_id: String,
        kind: &'static str,
        field: &'static str,
        message: String,
    },
    /// The evaluation task itself failed
    Failed { property_id: String, message: String },
}

impl PortfolioEntry {
    pub fn property_id(&self) -> &str {
        match self {
            PortfolioEntry::Evaluated(outcome) => &outcome.property_id,
            PortfolioEntry::Rejected { property_id, .. }
            | PortfolioEntry::Failed { property_id, .. } => property_id,
        }
    }

    pub fn outcome(&self) -> Option<&PropertyOutcome> {
        match self {
            PortfolioEntry::Evaluated(outcome) => Some(outcome),
            PortfolioEntry::Rejected { .. } | PortfolioEntry::Failed { .. } => None,
        }
    }
}
