use ft_client::ClientError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not authenticated {location}")]
    NotAuthenticated { location: ErrorLocation },

    #[error("{message}: {source} {location}")]
    Request {
        /// Text shown to the user: the server's message or a fallback
        message: String,
        #[source]
        source: ClientError,
        location: ErrorLocation,
    },
}

impl StoreError {
    /// Wrap a failed API call, preferring the server's message over `fallback`.
    #[track_caller]
    pub fn request(source: ClientError, fallback: &str) -> Self {
        let message = source
            .server_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();

        Self::Request {
            message,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_authenticated() -> Self {
        Self::NotAuthenticated {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated { .. } => "You need to log in first.".to_string(),
            Self::Request { message, .. } => message.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
