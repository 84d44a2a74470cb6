//! HTTP client for the FitTribe REST API.

pub mod auth_response;
pub mod client;
pub mod error;


pub use auth_response::AuthResponse;
pub use client::ApiClient;
pub use error::{ClientError, Result as ClientResult};
