use anyhow::Result;
use clap::Parser;
use tracing::debug;

use tvnorm::cli::{commands, Cli, Commands};
use tvnorm::config::PluginConfig;
use tvnorm::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => PluginConfig::load(std::path::Path::new(path))?,
        None => PluginConfig::default(),
    };
    config.validate()?;
    debug!("configuration: {:?}", config);

    match cli.command {
        Commands::Classify(args) => commands::classify(args, &config).await,
        Commands::Plan(args) => commands::plan(args, &config).await,
        Commands::Scan(args) => commands::scan(args, &config).await,
    }
}
