use crate::models::lenient::null_as_default;

use serde::{Deserialize, Serialize};

/// A message addressed to the current user. `read` is the only field the
/// client ever changes locally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Notification {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub read: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}
