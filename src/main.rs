use appeal_engine::cli::{Cli, Commands};
use appeal_engine::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize telemetry
    appeal_engine::telemetry::init_telemetry(&config.telemetry)?;

    if let Some(e) = load_error {
        tracing::warn!(
            path = %cli.config,
            error = %format!("{e:#}"),
            "Could not load config, using defaults"
        );
    }

    match cli.command {
        Commands::Decide(args) => {
            tracing::debug!(request = %args.request.display(), "Evaluating property");
            args.execute(&config).await?;
        }
        Commands::Batch(args) => {
            tracing::debug!(requests = %args.requests.display(), "Evaluating portfolio");
            args.execute(&config).await?;
        }
        Commands::Priors(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
