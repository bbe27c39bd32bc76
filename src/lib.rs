//! appeal-engine: property tax assessment classification and appeal economics
//!
//! This library provides the core components for:
//! - Confidence bands around market value estimates
//! - Jurisdiction appeal statistics with regional defaults
//! - Over / fair / under classification with appeal ROI
//! - NOI, cap rate and tax savings arithmetic
//! - Concurrent portfolio evaluation

pub mod cli;
pub mod confidence;
pub mod config;
pub mod decision;
pub mod error;
pub mod finance;
pub mod jurisdiction;
pub mod money;
pub mod portfolio;
pub mod telemetry;

pub use error::ValidationError;
