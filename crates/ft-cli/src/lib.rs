//! ft-cli library
//!
//! Command definitions and the runner that drives the FitTribe stores, kept
//! out of `main` so they can be exercised from tests.

pub mod booking_commands;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod notification_commands;
pub mod runner;


pub use cli::Cli;
pub use error::{CliError, Result as CliResult};
pub use runner::{Runner, run};
