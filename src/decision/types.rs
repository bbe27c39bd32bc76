//! Decision engine types

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Appeal classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppealDecision {
    /// Over-assessed, appeal recommended
    Over,
    /// Fairly assessed
    Fair,
    /// Under-assessed, appealing risks an increase
    Under,
}

impl AppealDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppealDecision::Over => "OVER",
            AppealDecision::Fair => "FAIR",
            AppealDecision::Under => "UNDER",
        }
    }
}

impl fmt::Display for AppealDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strongly the evidence backs the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Map accumulated evidence points to a level
    pub fn from_points(points: u8) -> Self {
        if points >= 5 {
            ConfidenceLevel::High
        } else if points >= 3 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::Medium => "MEDIUM",
            ConfidenceLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appeal recommendation with its economics and reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision: AppealDecision,
    pub confidence_level: ConfidenceLevel,
    /// Assessed / market value
    pub assessment_ratio: Decimal,
    /// Negative when a successful review would raise the assessment
    pub expected_annual_savings: Decimal,
    /// Return on appeal costs in percent, absent when there are no costs
    pub expected_roi: Option<Decimal>,
    /// Reduction needed to recoup costs over the horizon, percent of assessed value
    pub breakeven_reduction_pct: Decimal,
    pub primary_rationale: Vec<String>,
    pub risk_factors: Vec<String>,
    pub supporting_factors: Vec<String>,
    pub within_confidence_band: bool,
    pub success_probability: Decimal,
    pub reassessment_risk_warning: bool,
    pub total_appeal_costs: Decimal,
    pub net_savings_year_1: Decimal,
    pub cumulative_net_savings: Decimal,
}

impl DecisionResult {
    pub fn is_appeal_recommended(&self) -> bool {
        self.decision == AppealDecision::Over
    }
}
