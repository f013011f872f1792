use anyhow::Context;
use clap::Parser;
use dreamroll::config::{BotConfig, setup_logging};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = dreamroll::cli::CliOptions::parse();

    setup_logging(cli.debug).context("Failed to set up logging")?;

    let config = BotConfig::from_cli(&cli).context("Invalid configuration")?;

    if let Err(err) = dreamroll::discord::run_bot(config).await {
        error!("Bot error: {}", err);
        return Err(err.into());
    }
    Ok(())
}
