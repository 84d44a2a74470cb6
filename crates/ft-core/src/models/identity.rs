use crate::Role;

use serde::{Deserialize, Serialize};

/// The authenticated user as seen by this client.
///
/// Never fetched on its own: it comes either from the `user` object of a
/// login/register response or from the claims of the persisted token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl Identity {
    pub fn is_trainer(&self) -> bool {
        self.role == Role::Trainer
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
