//! Jurisdiction reference data lookup

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::priors::{default_priors, JurisdictionPriors};
use crate::error::ValidationError;

/// Source of jurisdiction priors keyed by jurisdiction identifier
pub trait PriorsStore: Send + Sync {
    /// Look up priors for a known jurisdiction
    fn lookup(&self, jurisdiction_id: &str) -> Option<JurisdictionPriors>;

    /// Look up priors, falling back to conservative regional defaults
    fn resolve(
        &self,
        jurisdiction_id: Option<&str>,
        region: &str,
    ) -> Result<JurisdictionPriors, ValidationError> {
        if let Some(priors) = jurisdiction_id.and_then(|id| self.lookup(id)) {
            return Ok(priors);
        }
        tracing::debug!(
            jurisdiction = jurisdiction_id.unwrap_or("-"),
            region,
            "No jurisdiction statistics, using default priors"
        );
        default_priors(region)
    }
}

/// Raw priors record as it appears in configuration files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriorsRecord {
    pub id: String,
    pub name: String,
    pub region: String,
    pub appeal_success_rate: Option<Decimal>,
    pub average_reduction_pct: Option<Decimal>,
    pub median_reduction_pct: Option<Decimal>,
    pub typical_filing_fee: Option<Decimal>,
    pub typical_attorney_cost: Option<Decimal>,
    pub average_timeline_days: Option<u32>,
    pub cod_target: Option<Decimal>,
    pub reassessment_risk_factor: Option<Decimal>,
    pub uses_market_value: Option<bool>,
    pub assessment_ratio: Option<Decimal>,
    pub last_revaluation_year: Option<i32>,
}

impl PriorsRecord {
    /// Validate into priors; unset statistics take the builder defaults
    pub fn to_priors(&self) -> Result<JurisdictionPriors, ValidationError> {
        let mut builder =
            JurisdictionPriors::builder(self.id.clone(), self.name.clone(), self.region.clone());

        if let Some(v) = self.appeal_success_rate {
            builder = builder.with_success_rate(v);
        }
        if let Some(v) = self.average_reduction_pct {
            builder = builder.with_average_reduction(v);
        }
        if let Some(v) = self.median_reduction_pct {
            builder = builder.with_median_reduction(v);
        }
        if let Some(v) = self.typical_filing_fee {
            builder = builder.with_filing_fee(v);
        }
        if let Some(v) = self.typical_attorney_cost {
            builder = builder.with_attorney_cost(v);
        }
        if let Some(v) = self.average_timeline_days {
            builder = builder.with_timeline_days(v);
        }
        if let Some(v) = self.cod_target {
            builder = builder.with_cod_target(v);
        }
        if let Some(v) = self.reassessment_risk_factor {
            builder = builder.with_reassessment_risk(v);
        }
        if let Some(v) = self.uses_market_value {
            builder = builder.with_market_value_basis(v);
        }
        if let Some(v) = self.assessment_ratio {
            builder = builder.with_assessment_ratio(v);
        }

        builder
            .with_last_revaluation_year(self.last_revaluation_year)
            .build()
    }
}

/// Priors held in memory, typically loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriorsStore {
    priors: HashMap<String, JurisdictionPriors>,
}

impl InMemoryPriorsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw records, validating each one
    pub fn from_records(records: &[PriorsRecord]) -> Result<Self, ValidationError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record.to_priors()?);
        }
        Ok(store)
    }

    /// Add or replace priors for a jurisdiction
    pub fn insert(&mut self, priors: JurisdictionPriors) {
        self.priors
            .insert(priors.jurisdiction_id().to_string(), priors);
    }

    pub fn len(&self) -> usize {
        self.priors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }
}

impl PriorsStore for InMemoryPriorsStore {
    fn lookup(&self, jurisdiction_id: &str) -> Option<JurisdictionPriors> {
        self.priors.get(jurisdiction_id).cloned()
    }
}
