use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ft_config::ConfigError),

    #[error("{0}")]
    Core(#[from] ft_core::CoreError),

    #[error("{0}")]
    Client(#[from] ft_client::ClientError),

    /// Shown as the user-facing message; the full chain goes to the log.
    #[error("{}", .0.user_message())]
    Store(#[from] ft_store::StoreError),

    /// A request that failed earlier, reported by its user-facing message.
    #[error("{message}")]
    Request { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    #[error("Nothing to update: pass at least one field to change {location}")]
    EmptyUpdate { location: ErrorLocation },

    #[error("Logger error: {message}")]
    Logger { message: String },
}

impl CliError {
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn empty_update() -> Self {
        Self::EmptyUpdate {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
