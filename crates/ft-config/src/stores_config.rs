use crate::DEFAULT_CLEAR_ON_LOGOUT;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoresConfig {
    /// Empty the booking and notification caches when the session ends.
    /// When off, kept data stays unreadable until its owner logs back in.
    pub clear_on_logout: bool,
}

impl Default for StoresConfig {
    fn default() -> Self {
        Self {
            clear_on_logout: DEFAULT_CLEAR_ON_LOGOUT,
        }
    }
}
