pub mod claims;
pub mod error;
pub mod token;
pub mod token_store;

pub use claims::TokenClaims;
pub use error::{AuthError, Result};
pub use token::{TokenInspection, decode_claims, inspect, inspect_now};
pub use token_store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};

#[cfg(test)]
mod tests;
