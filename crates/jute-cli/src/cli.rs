use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jute",
    about = "Jute: block DAG vote weighting and total ordering",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with a `[sage]` table
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the demonstration topologies
    List,
    /// Show edge weights and reachable counts for a topology
    Votes(TopologyArgs),
    /// Show the linear order of a topology
    Order(TopologyArgs),
    /// Emit a SageMath script for one topology, or `all`
    Sage(SageArgs),
}

#[derive(Args)]
pub struct TopologyArgs {
    pub topology: String,
    /// Use this node as the tip instead of the topology's last node
    #[arg(long)]
    pub tip: Option<u64>,
}

#[derive(Args)]
pub struct SageArgs {
    pub topology: String,
    /// Render only this node as the tip
    #[arg(long)]
    pub tip: Option<u64>,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
