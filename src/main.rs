use anyhow::Result;
use clap::Parser;

use outreach_portal::cli::commands::{
    CheckConfigCommand, Command, OperationsCommand, RunCommand,
};
use outreach_portal::cli::{Cli, Commands};
use outreach_portal::config::{config, ObservabilityConfig, PortalConfig};
use outreach_portal::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_file = PortalConfig::load_env_file();
    // A broken config still gets default logging so the error is reported.
    let observability = config()
        .map(|config| config.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    init_telemetry(&observability)?;
    if let Err(error) = env_file {
        tracing::warn!(error = %error, "Ignoring unreadable .env file");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        match cli.command {
            Commands::Operations { json } => {
                OperationsCommand::new().with_json(json).execute().await
            }
            Commands::Run { script, keep_going } => {
                RunCommand::new(script)
                    .with_keep_going(keep_going)
                    .execute()
                    .await
            }
            Commands::CheckConfig => CheckConfigCommand::new().execute().await,
        }
    })
}
