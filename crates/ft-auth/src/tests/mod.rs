
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::json;

pub(crate) const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

pub(crate) fn create_test_token(payload: &serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        payload,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .unwrap()
}

pub(crate) fn claims_expiring_in(seconds: i64) -> serde_json::Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "id": "user-123",
        "name": "Ana Trainer",
        "email": "ana@example.com",
        "role": "trainer",
        "profileImage": "/img/ana.png",
        "iat": now,
        "exp": now + seconds,
    })
}
