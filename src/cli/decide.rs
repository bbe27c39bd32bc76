//! Decide command implementation

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;

use crate::config::Config;
use crate::portfolio::{Evaluator, PropertyRequest};

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Property request file (JSON)
    pub request: PathBuf,

    /// Age valuation dates against this date instead of today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

impl DecideArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let request: PropertyRequest = super::read_json(&self.request)?;

        let mut evaluator = Evaluator::new(config.engine.clone(), config.priors_store()?);
        if let Some(as_of) = self.as_of {
            evaluator = evaluator.with_as_of(as_of);
        }

        let outcome = evaluator
            .evaluate(&request)
            .with_context(|| format!("evaluating property {}", request.property_id))?;

        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(())
    }
}
