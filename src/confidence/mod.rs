//! Confidence band module
//!
//! Turns a market value estimate and its reliability metadata into an
//! uncertainty interval, a confidence score and a reliability grade.

mod band;
mod dispersion;
mod estimate;
mod types;

pub use band::calculate;
pub(crate) use types::ensure_central_estimate;
pub use dispersion::{coefficient_of_variation, method_consistency};
pub use estimate::{
    ValuationEstimate, ValuationEstimateBuilder, MAX_OTHER_ESTIMATES, MAX_VALUATION_AGE_DAYS,
};
pub use types::{
    ConfidenceResult, MarketCondition, ReliabilityGrade, ValuationMethod, MAX_BAND, MIN_BAND,
    MIN_CENTRAL_ESTIMATE,
};
