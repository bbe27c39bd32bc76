//! Property and portfolio evaluation

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, info_span, warn};

use super::request::{PortfolioEntry, PropertyOutcome, PropertyRequest};
use crate::config::EngineConfig;
use crate::confidence::{self, ValuationEstimate, ValuationMethod, MAX_OTHER_ESTIMATES};
use crate::decision::{self, DecisionInput};
use crate::error::ValidationError;
use crate::finance::{calculate_cap_rate, CapRateInput, TaxRate};
use crate::jurisdiction::PriorsStore;
use crate::telemetry::{record_decision, record_latency, record_validation_failure, LatencyMetric};

/// Runs the confidence and decision stages for property requests
pub struct Evaluator {
    defaults: EngineConfig,
    store: Box<dyn PriorsStore>,
    as_of: NaiveDate,
}

impl Evaluator {
    /// Create an evaluator; valuation dates are aged against today (UTC)
    pub fn new(defaults: EngineConfig, store: impl PriorsStore + 'static) -> Self {
        Self {
            defaults,
            store: Box::new(store),
            as_of: Utc::now().date_naive(),
        }
    }

    /// Age valuation dates against a fixed date instead of today
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn defaults(&self) -> &EngineConfig {
        &self.defaults
    }

    /// Evaluate one property
    pub fn evaluate(&self, request: &PropertyRequest) -> Result<PropertyOutcome, ValidationError> {
        let span = info_span!("evaluate", property_id = %request.property_id);
        let _enter = span.enter();
        let start = Instant::now();

        let result = self.run_stages(request);
        record_latency(LatencyMetric::Evaluation, start.elapsed());

        match &result {
            Ok(outcome) => {
                record_decision(outcome.decision.decision);
                debug!(
                    decision = %outcome.decision.decision,
                    confidence = %outcome.decision.confidence_level,
                    "Property evaluated"
                );
            }
            Err(e) => {
                record_validation_failure(e);
                warn!(error = %e, "Property rejected");
            }
        }

        result
    }

    fn run_stages(&self, request: &PropertyRequest) -> Result<PropertyOutcome, ValidationError> {
        let estimate = self.build_estimate(request)?;
        let band = confidence::calculate(&estimate);

        let priors = self
            .store
            .resolve(request.jurisdiction_id.as_deref(), &request.region)?;
        let tax_rate = TaxRate::new(request.tax_rate, request.tax_rate_basis)?;

        let thresholds = &request.thresholds;
        let input = DecisionInput::builder(
            request.assessed_value,
            band.central_estimate,
            band.clone(),
            priors.clone(),
            tax_rate.effective(),
        )
        .with_costs(
            request.costs.filing_fee,
            request.costs.attorney_fee,
            request.costs.other_costs,
        )
        .with_min_roi_threshold(
            thresholds
                .min_roi_threshold
                .unwrap_or(self.defaults.min_roi_threshold),
        )
        .with_min_savings_threshold(
            thresholds
                .min_savings_threshold
                .unwrap_or(self.defaults.min_savings_threshold),
        )
        .with_horizon_years(
            thresholds
                .appeal_horizon_years
                .unwrap_or(self.defaults.appeal_horizon_years),
        )
        .build()?;

        Ok(PropertyOutcome {
            property_id: request.property_id.clone(),
            jurisdiction_id: priors.jurisdiction_id().to_string(),
            confidence: band,
            decision: decision::decide(&input),
        })
    }

    fn build_estimate(&self, request: &PropertyRequest) -> Result<ValuationEstimate, ValidationError> {
        let valuation = &request.valuation;
        let mut builder =
            ValuationEstimate::builder(valuation.estimated_market_value, valuation.method)
                .with_comparables(valuation.comparable_sales.iter().copied())
                .with_other_estimates(
                    valuation
                        .other_estimates
                        .iter()
                        .map(|other| (other.value, other.method)),
                )
                .with_market_condition(valuation.market_conditions);

        if let Some(income) = request.income_approach {
            // The implied value takes an estimate slot of its own
            if valuation.other_estimates.len() >= MAX_OTHER_ESTIMATES {
                return Err(ValidationError::RangeViolation {
                    field: "income_approach",
                    value: format!("{} other estimates", valuation.other_estimates.len()),
                    expected: format!(
                        "at most {} other estimates alongside an income approach",
                        MAX_OTHER_ESTIMATES - 1
                    ),
                });
            }
            let cap_rate = CapRateInput::from_target_rate(
                income.net_operating_income,
                income.target_cap_rate,
            )?;
            if let Some(implied) = calculate_cap_rate(&cap_rate).implied_value {
                builder = builder.with_other_estimate(implied, ValuationMethod::IncomeApproach);
            }
        }
        if let Some(score) = valuation.data_quality_score {
            builder = builder.with_data_quality(score);
        }
        if let Some(score) = valuation.property_uniqueness {
            builder = builder.with_uniqueness(score);
        }
        if let Some(days) = valuation.days_since_valuation {
            builder = builder.with_days_since_valuation(days);
        }
        if let Some(date) = valuation.valuation_date {
            builder = builder.with_valuation_date(date, self.as_of);
        }

        builder.build()
    }
}

/// Evaluate every property concurrently, one task each
///
/// Entries come back in request order. A rejected property is reported in
/// its slot and does not stop the rest of the batch.
pub async fn evaluate_portfolio(
    evaluator: Arc<Evaluator>,
    requests: Vec<PropertyRequest>,
) -> Vec<PortfolioEntry> {
    let start = Instant::now();
    let count = requests.len();

    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let evaluator = Arc::clone(&evaluator);
            let property_id = request.property_id.clone();
            let handle = tokio::spawn(async move { evaluator.evaluate(&request) });
            (property_id, handle)
        })
        .collect();

    let mut entries = Vec::with_capacity(count);
    for (property_id, handle) in handles {
        let entry = match handle.await {
            Ok(Ok(outcome)) => PortfolioEntry::Evaluated(outcome),
            Ok(Err(e)) => PortfolioEntry::Rejected {
                property_id,
                kind: e.kind(),
                field: e.field(),
                message: e.to_string(),
            },
            Err(e) => {
                warn!(property_id = %property_id, error = %e, "Evaluation task failed");
                PortfolioEntry::Failed {
                    property_id,
                    message: e.to_string(),
                }
            }
        };
        entries.push(entry);
    }

    record_latency(LatencyMetric::Portfolio, start.elapsed());
    info!(
        properties = count,
        evaluated = entries.iter().filter(|e| e.outcome().is_some()).count(),
        elapsed_ms = start.elapsed().as_millis(),
        "Portfolio evaluated"
    );

    entries
}
