use ft_core::Identity;

use serde::{Deserialize, Serialize};

/// Body returned by the login and register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Identity,
}
