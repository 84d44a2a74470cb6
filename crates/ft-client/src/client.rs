use crate::{AuthResponse, ClientError, ClientResult};

use ft_core::{Booking, BookingPatch, Notification, Role};

use std::time::Duration;

use log::debug;
use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

/// HTTP client for the FitTribe REST API.
///
/// One instance is shared by the session store and the entity caches, so the
/// bearer token set at login is attached to every later request.
pub struct ApiClient {
    pub base_url: String,
    client: ReqwestClient,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    /// Create a new client without a request timeout
    ///
    /// # Arguments
    /// * `base_url` - API origin (e.g., "http://127.0.0.1:5000")
    pub fn new(base_url: &str) -> Self {
        Self::from_parts(base_url, ReqwestClient::new())
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(Self::from_parts(base_url, client))
    }

    fn from_parts(base_url: &str, client: ReqwestClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            bearer: RwLock::new(None),
        }
    }

    /// Attach (or with `None`, detach) the bearer token sent on every request
    pub async fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer.write().await = token;
    }

    pub async fn has_bearer_token(&self) -> bool {
        self.bearer.read().await.is_some()
    }

    /// Build a request with the bearer header when a session is active
    async fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, path);
        let mut req = self.client.request(method, &url);

        if let Some(ref token) = *self.bearer.read().await {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Send the request and return the raw body of a successful response
    async fn send(&self, req: reqwest::RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&body)
                .ok()
                .and_then(|value| Self::extract_message(&value));
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        Ok(body.to_vec())
    }

    /// Execute request and deserialize the response body
    async fn execute<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let body = self.send(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute request whose response body carries nothing we need
    async fn execute_empty(&self, req: reqwest::RequestBuilder) -> ClientResult<()> {
        self.send(req).await?;
        Ok(())
    }

    /// `message` at the top level, else `error.message`
    fn extract_message(body: &Value) -> Option<String> {
        body.get("message")
            .and_then(|v| v.as_str())
            .or_else(|| {
                body.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|v| v.as_str())
            })
            .map(String::from)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Exchange credentials for a token and the user profile
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        let body = LoginRequest { email, password };
        let req = self
            .request(Method::POST, "/api/users/login")
            .await
            .json(&body);
        self.execute(req).await
    }

    /// Create an account and receive a token for it
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ClientResult<AuthResponse> {
        #[derive(Serialize)]
        struct RegisterRequest<'a> {
            name: &'a str,
            email: &'a str,
            password: &'a str,
            role: Role,
        }

        let body = RegisterRequest {
            name,
            email,
            password,
            role,
        };
        let req = self
            .request(Method::POST, "/api/users/register")
            .await
            .json(&body);
        self.execute(req).await
    }

    /// Ask the server to email a password reset link
    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        #[derive(Serialize)]
        struct ForgotPasswordRequest<'a> {
            email: &'a str,
        }

        let req = self
            .request(Method::POST, "/api/users/forgot-password")
            .await
            .json(&ForgotPasswordRequest { email });
        self.execute_empty(req).await
    }

    /// Redeem a reset token for a new password
    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        #[derive(Serialize)]
        struct ResetPasswordRequest<'a> {
            token: &'a str,
            password: &'a str,
        }

        let req = self
            .request(Method::POST, "/api/users/reset-password")
            .await
            .json(&ResetPasswordRequest { token, password });
        self.execute_empty(req).await
    }

    // =========================================================================
    // Booking Operations
    // =========================================================================

    /// Bookings the current user made as a client
    pub async fn list_user_bookings(&self) -> ClientResult<Vec<Booking>> {
        let req = self.request(Method::GET, "/api/bookings/user").await;
        self.execute(req).await
    }

    /// Bookings assigned to the current user as a trainer
    pub async fn list_trainer_bookings(&self) -> ClientResult<Vec<Booking>> {
        let req = self.request(Method::GET, "/api/bookings/trainer").await;
        self.execute(req).await
    }

    /// Create a booking
    pub async fn create_booking(&self, data: &BookingPatch) -> ClientResult<Booking> {
        let req = self.request(Method::POST, "/api/bookings").await.json(data);
        self.execute(req).await
    }

    /// Update a booking; the response may only carry the changed fields
    pub async fn update_booking(&self, id: &str, data: &BookingPatch) -> ClientResult<BookingPatch> {
        let req = self
            .request(Method::PUT, &format!("/api/bookings/{}", id))
            .await
            .json(data);
        self.execute(req).await
    }

    /// Cancel a booking
    pub async fn cancel_booking(&self, id: &str) -> ClientResult<()> {
        let req = self
            .request(Method::PUT, &format!("/api/bookings/{}/cancel", id))
            .await;
        self.execute_empty(req).await
    }

    // =========================================================================
    // Notification Operations
    // =========================================================================

    /// List the current user's notifications
    pub async fn list_notifications(&self) -> ClientResult<Vec<Notification>> {
        let req = self.request(Method::GET, "/api/notifications").await;
        self.execute(req).await
    }

    /// Mark one notification as read
    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<()> {
        let req = self
            .request(Method::PUT, &format!("/api/notifications/{}/read", id))
            .await;
        self.execute_empty(req).await
    }

    /// Mark every notification as read
    pub async fn mark_all_notifications_read(&self) -> ClientResult<()> {
        let req = self
            .request(Method::PUT, "/api/notifications/read-all")
            .await;
        self.execute_empty(req).await
    }

    /// Delete a notification
    pub async fn delete_notification(&self, id: &str) -> ClientResult<()> {
        let req = self
            .request(Method::DELETE, &format!("/api/notifications/{}", id))
            .await;
        self.execute_empty(req).await
    }
}
