use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;
mod topologies;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = config::CliConfig::load(cli.config.as_deref())?;
    commands::run_command(cli, &config)
}
