//! Session store: who is logged in, and the operations that change it.
//!
//! The identity is published through a `watch` channel so the entity caches
//! can follow login and logout without holding a reference to the session.
//!
//! State machine:
//!
//! ```text
//! anonymous --(login | register | valid persisted token)--> authenticated
//! authenticated --(logout | expired token detected)--> anonymous
//! ```

use crate::{Navigator, Route, StoreError, StoreResult, StoreStatus};

use ft_auth::{TokenStore, inspect_now};
use ft_client::{ApiClient, AuthResponse, ClientError};
use ft_core::{Identity, Role};

use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::watch;

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
const FORGOT_PASSWORD_FAILED: &str = "Failed to send reset email. Please try again.";
const RESET_PASSWORD_FAILED: &str = "Failed to reset password. Please try again.";

pub struct Session {
    api: Arc<ApiClient>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    identity_tx: watch::Sender<Option<Identity>>,
    status: StoreStatus,
}

impl Session {
    /// Create an anonymous session. Call [`Session::restore`] to pick up a
    /// persisted token.
    pub fn new(
        api: Arc<ApiClient>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (identity_tx, _) = watch::channel(None);
        Self {
            api,
            tokens,
            navigator,
            identity_tx,
            status: StoreStatus::new(),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity_tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity_tx.borrow().is_some()
    }

    /// Receiver that observes every identity change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity_tx.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }

    /// Rebuild the session from the persisted token, without a server round
    /// trip. Expired or undecodable tokens are deleted and the session stays
    /// anonymous.
    pub async fn restore(&self) -> Option<Identity> {
        let _in_flight = self.status.begin();

        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!("Unable to read persisted token: {e}");
                return None;
            }
        };

        match inspect_now(&token) {
            Ok(inspection) => {
                self.api.set_bearer_token(Some(token)).await;
                info!(
                    "Restored session for {} ({})",
                    inspection.identity.id, inspection.identity.role
                );
                self.publish(Some(inspection.identity.clone()));
                Some(inspection.identity)
            }
            Err(e) if e.discards_token() => {
                warn!("Discarding persisted token: {e}");
                self.end_session().await;
                None
            }
            Err(e) => {
                warn!("Unable to inspect persisted token: {e}");
                None
            }
        }
    }

    /// Re-check the persisted token's expiry. An expired session is dropped
    /// silently; returns whether a session is still active.
    pub async fn ensure_fresh(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        let still_valid = match self.tokens.load() {
            Ok(Some(token)) => match inspect_now(&token) {
                Ok(_) => true,
                Err(e) if e.discards_token() => {
                    info!("Session ended: {e}");
                    false
                }
                Err(e) => {
                    warn!("Unable to inspect persisted token: {e}");
                    true
                }
            },
            Ok(None) => false,
            Err(e) => {
                warn!("Unable to read persisted token: {e}");
                return true;
            }
        };

        if !still_valid {
            self.end_session().await;
        }

        still_valid
    }

    pub async fn login(&self, email: &str, password: &str) -> StoreResult<Route> {
        let _in_flight = self.status.begin();

        match self.api.login(email, password).await {
            Ok(response) => {
                let route = Route::after_login(response.user.role);
                self.start_session(response).await;
                self.navigator.navigate(route);
                Ok(route)
            }
            Err(e) => Err(self.fail(e, LOGIN_FAILED)),
        }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> StoreResult<Route> {
        let _in_flight = self.status.begin();

        match self.api.register(name, email, password, role).await {
            Ok(response) => {
                let route = Route::after_registration(role);
                self.start_session(response).await;
                self.navigator.navigate(route);
                Ok(route)
            }
            Err(e) => Err(self.fail(e, REGISTRATION_FAILED)),
        }
    }

    /// Always succeeds; storage failures are logged, never surfaced.
    pub async fn logout(&self) -> Route {
        self.end_session().await;
        info!("Logged out");
        self.navigator.navigate(Route::Landing);
        Route::Landing
    }

    pub async fn forgot_password(&self, email: &str) -> StoreResult<()> {
        let _in_flight = self.status.begin();

        self.api
            .forgot_password(email)
            .await
            .map_err(|e| self.fail(e, FORGOT_PASSWORD_FAILED))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> StoreResult<Route> {
        let _in_flight = self.status.begin();

        match self.api.reset_password(token, new_password).await {
            Ok(()) => {
                self.navigator.navigate(Route::Login);
                Ok(Route::Login)
            }
            Err(e) => Err(self.fail(e, RESET_PASSWORD_FAILED)),
        }
    }

    async fn start_session(&self, response: AuthResponse) {
        let AuthResponse { token, user } = response;

        if let Err(e) = self.tokens.save(&token) {
            warn!("Logged in but could not persist token: {e}");
        }

        self.api.set_bearer_token(Some(token)).await;
        info!("Logged in as {} ({})", user.id, user.role);
        self.publish(Some(user));
    }

    async fn end_session(&self) {
        if let Err(e) = self.tokens.clear() {
            error!("Failed to remove persisted token: {e}");
        }
        self.api.set_bearer_token(None).await;
        self.publish(None);
    }

    /// Notify observers only when the identity actually changes.
    fn publish(&self, identity: Option<Identity>) {
        self.identity_tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        });
    }

    #[track_caller]
    fn fail(&self, source: ClientError, fallback: &str) -> StoreError {
        let err = StoreError::request(source, fallback);
        warn!("{err}");
        self.status.set_error(Some(err.user_message()));
        err
    }
}
