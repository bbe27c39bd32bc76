//! CLI interface for appeal-engine
//!
//! Provides subcommands for:
//! - `decide`: Evaluate a single property request
//! - `batch`: Evaluate a portfolio of property requests concurrently
//! - `priors`: Show the jurisdiction priors that would be applied
//! - `config`: Show the effective configuration

mod batch;
mod decide;
mod priors;

pub use batch::BatchArgs;
pub use decide::DecideArgs;
pub use priors::PriorsArgs;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "appeal-engine")]
#[command(about = "Property tax assessment classification and appeal economics")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "appeal-engine.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one property request (JSON)
    Decide(DecideArgs),
    /// Evaluate a JSON array of property requests
    Batch(BatchArgs),
    /// Show resolved jurisdiction priors
    Priors(PriorsArgs),
    /// Show effective configuration
    Config,
}

/// Read and parse a JSON document
fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
