#![allow(dead_code)]

use ft_auth::{MemoryTokenStore, TokenStore};
use ft_client::ApiClient;
use ft_config::StoresConfig;
use ft_store::{App, BookingCache, NotificationCache, RecordingNavigator, Session};

use std::sync::Arc;

use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

/// Mint a token whose claims match what the API issues.
pub fn create_token(id: &str, role: &str, expires_in_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("{id}@example.com"),
        "role": role,
        "iat": now,
        "exp": now + expires_in_secs,
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("Failed to encode JWT")
}

pub fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("{id}@example.com"),
        "role": role
    })
}

pub fn booking_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "trainerId": "t1",
        "clientId": "c1",
        "date": "2024-01-01",
        "startTime": "09:00",
        "endTime": "10:00",
        "status": status,
        "sessionType": "strength",
        "price": 45.0,
        "location": "Main gym",
        "notes": "Bring shoes"
    })
}

pub fn notification_json(id: &str, read: bool) -> Value {
    json!({
        "id": id,
        "userId": "c1",
        "message": format!("Notification {id}"),
        "type": "booking",
        "read": read,
        "createdAt": "2024-01-01T08:00:00Z"
    })
}

/// Mock API plus a session wired to in-memory token storage.
pub struct TestFixture {
    pub server: MockServer,
    pub api: Arc<ApiClient>,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub session: Arc<Session>,
}

impl TestFixture {
    pub async fn anonymous() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    /// Session restored from a freshly minted token for `id` with `role`.
    pub async fn logged_in(id: &str, role: &str) -> Self {
        let fixture = Self::with_tokens(MemoryTokenStore::with_token(create_token(id, role, 3600)))
            .await;
        fixture
            .session
            .restore()
            .await
            .expect("fixture token should restore");
        fixture
    }

    async fn with_tokens(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let api = Arc::new(ApiClient::new(&server.uri()));
        let tokens = Arc::new(tokens);
        let navigator = Arc::new(RecordingNavigator::new());
        let session = Arc::new(Session::new(
            api.clone(),
            tokens.clone(),
            navigator.clone(),
        ));

        Self {
            server,
            api,
            tokens,
            navigator,
            session,
        }
    }

    pub fn booking_cache(&self) -> BookingCache {
        BookingCache::new(self.api.clone(), self.session.subscribe())
    }

    pub fn notification_cache(&self) -> NotificationCache {
        NotificationCache::new(self.api.clone(), self.session.subscribe())
    }

    pub fn persisted_token(&self) -> Option<String> {
        self.tokens.load().unwrap()
    }
}

/// Mount an [`App`] against `server` with the given persisted token.
pub async fn mount_app(
    server: &MockServer,
    token: Option<String>,
    clear_on_logout: bool,
) -> (App, Arc<MemoryTokenStore>, Arc<RecordingNavigator>) {
    let api = Arc::new(ApiClient::new(&server.uri()));
    let tokens = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let navigator = Arc::new(RecordingNavigator::new());
    let config = StoresConfig { clear_on_logout };

    let app = App::mount(api, tokens.clone(), navigator.clone(), &config).await;
    (app, tokens, navigator)
}
