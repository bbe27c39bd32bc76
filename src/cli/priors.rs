//! Priors command implementation

use clap::Args;

use crate::config::Config;
use crate::jurisdiction::PriorsStore;

#[derive(Args, Debug)]
pub struct PriorsArgs {
    /// Two-letter region code
    pub region: String,

    /// Jurisdiction identifier from the configuration
    #[arg(long)]
    pub jurisdiction: Option<String>,
}

impl PriorsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = config.priors_store()?;
        let priors = store.resolve(self.jurisdiction.as_deref(), &self.region)?;
        println!("{}", serde_json::to_string_pretty(&priors)?);
        Ok(())
    }
}
