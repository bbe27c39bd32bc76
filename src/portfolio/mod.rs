//! Portfolio evaluation
//!
//! Runs the confidence and decision stages for batches of properties.

mod evaluator;
mod request;

pub use evaluator::{evaluate_portfolio, Evaluator};
pub use request::{
    CostRequest, IncomeApproachRequest, OtherEstimate, PortfolioEntry, PropertyOutcome,
    PropertyRequest, ThresholdOverrides, ValuationRequest,
};
