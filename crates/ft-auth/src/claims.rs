use crate::{AuthError, Result as AuthErrorResult};

use ft_core::{Identity, Role};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Claims the FitTribe API embeds in its credential tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issued at timestamp (Unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.id.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "id".to_string(),
                message: "id cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Expired when `exp` lies strictly before `now_millis`.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        self.exp.saturating_mul(1000) < now_millis
    }

    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            profile_image: self.profile_image.clone(),
        }
    }
}
