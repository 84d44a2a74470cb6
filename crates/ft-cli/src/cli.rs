use crate::commands::Commands;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ft")]
#[command(about = "FitTribe command-line client")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API origin (overrides api.base_url from config.toml)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
