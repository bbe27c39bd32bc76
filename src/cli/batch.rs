//! Batch command implementation

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;

use crate::config::Config;
use crate::decision::AppealDecision;
use crate::portfolio::{evaluate_portfolio, Evaluator, PropertyRequest};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File holding a JSON array of property requests
    pub requests: PathBuf,

    /// Age valuation dates against this date instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl BatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let requests: Vec<PropertyRequest> = super::read_json(&self.requests)?;
        tracing::info!(count = requests.len(), "Evaluating portfolio");

        let mut evaluator = Evaluator::new(config.engine.clone(), config.priors_store()?);
        if let Some(as_of) = self.as_of {
            evaluator = evaluator.with_as_of(as_of);
        }

        let entries = evaluate_portfolio(Arc::new(evaluator), requests).await;

        let appeals = entries
            .iter()
            .filter_map(|entry| entry.outcome())
            .filter(|outcome| outcome.decision.decision == AppealDecision::Over)
            .count();
        tracing::info!(appeals, "Appeals recommended");

        println!("{}", serde_json::to_string_pretty(&entries)?);
        Ok(())
    }
}
