//! Appeal decision module
//!
//! Classifies an assessment as over, fair or under and projects whether an
//! appeal pays for itself.

mod engine;
mod input;
mod types;

pub use engine::decide;
pub use input::{
    DecisionInput, DecisionInputBuilder, DEFAULT_HORIZON_YEARS, DEFAULT_MIN_ROI_THRESHOLD,
    DEFAULT_MIN_SAVINGS_THRESHOLD, MAX_HORIZON_YEARS,
};
pub use types::{AppealDecision, ConfidenceLevel, DecisionResult};
