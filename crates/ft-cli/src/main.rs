//! ft - FitTribe command-line client
//!
//! Every command prints JSON on stdout; errors go to stderr with a failure
//! exit code.
//!
//! # Examples
//!
//! ```bash
//! # Log in (the token is kept under ~/.fittribe/)
//! ft login --email ana@example.com --password secret
//!
//! # Book a session
//! ft booking create --trainer-id t1 --date 2024-01-01 --start-time 09:00 --end-time 10:00
//!
//! # Unread notifications
//! ft notification unread-count --pretty
//! ```

use ft_auth::FileTokenStore;
use ft_cli::{Cli, CliResult, logger};
use ft_config::Config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{debug, log_enabled};
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    match execute(cli).await {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            debug!("Command failed: {e:?}");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> CliResult<Value> {
    // Load and validate configuration
    let config = Config::load()?;
    config.validate()?;

    let log_file = config.logging.file.as_ref().map(|file| -> CliResult<PathBuf> {
        let path = PathBuf::from(file);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(Config::config_dir()?.join(path))
        }
    });
    let log_file = log_file.transpose()?;

    logger::initialize(config.logging.level, log_file, config.logging.colored)?;

    if log_enabled!(log::Level::Debug) {
        config.log_summary();
    }

    let tokens = Arc::new(FileTokenStore::new(config.token_path()?));
    ft_cli::run(cli, config, tokens).await
}
