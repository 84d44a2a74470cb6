mod common;

use common::{TestFixture, create_token, user_json};

use ft_auth::{MemoryTokenStore, TokenStore};
use ft_client::ApiClient;
use ft_core::Role;
use ft_store::{RecordingNavigator, Route, Session, StoreError};

use std::sync::Arc;

use googletest::prelude::*;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

async fn mock_login(server: &MockServer, token: &str, role: &str) {
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "user": user_json("u1", role)
        })))
        .mount(server)
        .await;
}

// =========================================================================
// Restore
// =========================================================================

#[tokio::test]
async fn given_valid_persisted_token_when_restored_then_identity_comes_from_claims() {
    // Given: A token for a trainer that expires in an hour
    let fixture = TestFixture::anonymous().await;
    fixture
        .tokens
        .save(&create_token("t1", "trainer", 3600))
        .unwrap();

    // When: Restoring the session
    let restored = fixture.session.restore().await;

    // Then: The session is authenticated with the claim values
    let identity = restored.unwrap();
    assert_that!(identity.id.as_str(), eq("t1"));
    assert_that!(identity.role, eq(Role::Trainer));
    assert_that!(fixture.session.is_authenticated(), eq(true));
    assert_that!(fixture.api.has_bearer_token().await, eq(true));
}

#[tokio::test]
async fn given_rs256_persisted_token_when_restored_then_token_is_kept() {
    // Given: An RS256 token the client holds no key for
    let fixture = TestFixture::anonymous().await;
    let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.\
                 eyJpZCI6InVzZXItMTIzIiwibmFtZSI6IkFuYSBUcmFpbmVyIiwiZW1haWwiOiJhbmFAZXhhbXBsZS5jb20iLCJyb2xlIjoidHJhaW5lciIsImV4cCI6NDEwMjQ0NDgwMH0.\
                 c2lnbmF0dXJl";
    fixture.tokens.save(token).unwrap();

    // When: Restoring the session
    let restored = fixture.session.restore().await;

    // Then: The identity is read and the token stays on disk
    assert_that!(restored.map(|identity| identity.id), some(eq("user-123")));
    assert_that!(fixture.persisted_token(), some(eq(token)));
}

#[tokio::test]
async fn given_token_expired_one_second_ago_when_restored_then_token_is_removed() {
    // Given: A token whose exp is one second in the past
    let fixture = TestFixture::anonymous().await;
    fixture
        .tokens
        .save(&create_token("c1", "client", -1))
        .unwrap();

    // When: Restoring the session
    let restored = fixture.session.restore().await;

    // Then: Nothing is restored and the token is gone
    assert_that!(restored, none());
    assert_that!(fixture.session.is_authenticated(), eq(false));
    assert_that!(fixture.persisted_token(), none());
    assert_that!(fixture.api.has_bearer_token().await, eq(false));
}

#[tokio::test]
async fn given_malformed_token_when_restored_then_session_is_anonymous_and_token_removed() {
    // Given: Garbage in the token slot
    let fixture = TestFixture::anonymous().await;
    fixture.tokens.save("not-a-jwt").unwrap();

    // When: Restoring the session
    let restored = fixture.session.restore().await;

    // Then: The token is discarded without surfacing an error
    assert_that!(restored, none());
    assert_that!(fixture.persisted_token(), none());
    assert_that!(fixture.session.error(), none());
}

#[tokio::test]
async fn given_no_persisted_token_when_restored_then_session_stays_anonymous() {
    // Given: Empty token storage
    let fixture = TestFixture::anonymous().await;

    // When: Restoring the session
    let restored = fixture.session.restore().await;

    // Then: Nothing happens
    assert_that!(restored, none());
    assert_that!(fixture.session.is_loading(), eq(false));
    assert_that!(fixture.navigator.routes(), is_empty());
}

#[tokio::test]
async fn given_restored_session_when_token_expires_then_ensure_fresh_logs_out() {
    // Given: A session restored from a valid token
    let fixture = TestFixture::logged_in("c1", "client").await;
    assert_that!(fixture.session.ensure_fresh().await, eq(true));

    // When: The persisted token is replaced by an expired one
    fixture
        .tokens
        .save(&create_token("c1", "client", -1))
        .unwrap();
    let still_active = fixture.session.ensure_fresh().await;

    // Then: The session ends silently
    assert_that!(still_active, eq(false));
    assert_that!(fixture.session.identity(), none());
    assert_that!(fixture.persisted_token(), none());
    assert_that!(fixture.session.error(), none());
}

// =========================================================================
// Login
// =========================================================================

#[tokio::test]
async fn given_admin_credentials_when_logging_in_then_navigates_to_admin_dashboard() {
    // Given: The API accepts the credentials for an admin
    let fixture = TestFixture::anonymous().await;
    let token = create_token("u1", "admin", 3600);
    mock_login(&fixture.server, &token, "admin").await;

    // When: Logging in
    let route = fixture
        .session
        .login("u1@example.com", "secret")
        .await
        .unwrap();

    // Then: Token persisted, identity set, admin dashboard requested
    assert_that!(route, eq(Route::AdminDashboard));
    assert_that!(fixture.navigator.last(), some(eq(Route::AdminDashboard)));
    assert_that!(fixture.persisted_token(), some(eq(&token)));
    assert_that!(fixture.session.identity().unwrap().role, eq(Role::Admin));
    assert_that!(fixture.session.is_loading(), eq(false));
}

#[tokio::test]
async fn given_trainer_credentials_when_logging_in_then_navigates_to_trainer_dashboard() {
    // Given: The API accepts the credentials for a trainer
    let fixture = TestFixture::anonymous().await;
    mock_login(&fixture.server, &create_token("u1", "trainer", 3600), "trainer").await;

    // When: Logging in
    let route = fixture.session.login("u1@example.com", "secret").await;

    // Then: The trainer dashboard is requested
    assert_that!(route.unwrap(), eq(Route::TrainerDashboard));
}

#[tokio::test]
async fn given_client_credentials_when_logging_in_then_navigates_to_dashboard() {
    // Given: The API accepts the credentials for a client
    let fixture = TestFixture::anonymous().await;
    mock_login(&fixture.server, &create_token("u1", "client", 3600), "client").await;

    // When: Logging in
    let route = fixture.session.login("u1@example.com", "secret").await;

    // Then: The default dashboard is requested
    assert_that!(route.unwrap(), eq(Route::Dashboard));
    assert_that!(fixture.navigator.routes(), eq(&vec![Route::Dashboard]));
}

#[tokio::test]
async fn given_logged_in_session_when_calling_api_then_bearer_token_is_attached() {
    // Given: A successful login
    let fixture = TestFixture::anonymous().await;
    let token = create_token("u1", "client", 3600);
    mock_login(&fixture.server, &token, "client").await;
    fixture
        .session
        .login("u1@example.com", "secret")
        .await
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&fixture.server)
        .await;

    // When: Issuing an authenticated request
    let result = fixture.api.list_notifications().await;

    // Then: The server saw the bearer header
    assert_that!(result, ok(is_empty()));
}

#[tokio::test]
async fn given_rejected_credentials_when_logging_in_then_server_message_is_surfaced() {
    // Given: An existing session and a server that rejects the next login
    let fixture = TestFixture::logged_in("c1", "client").await;
    let before = fixture.persisted_token();
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&fixture.server)
        .await;

    // When: Logging in with bad credentials
    let err = fixture
        .session
        .login("c1@example.com", "wrong")
        .await
        .unwrap_err();

    // Then: The message is exposed and prior state is untouched
    assert_that!(err.user_message().as_str(), eq("Invalid credentials"));
    assert_that!(fixture.session.error(), some(eq("Invalid credentials")));
    assert_that!(fixture.session.identity().unwrap().id.as_str(), eq("c1"));
    assert_that!(fixture.persisted_token(), eq(&before));
    assert_that!(fixture.navigator.routes(), is_empty());
}

#[tokio::test]
async fn given_failure_without_message_when_logging_in_then_fallback_is_used() {
    // Given: A server error with a body that carries no message
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&fixture.server)
        .await;

    // When: Logging in
    let result = fixture.session.login("a@example.com", "pw").await;

    // Then: The generic login message is used
    assert!(matches!(result, Err(StoreError::Request { .. })));
    assert_that!(
        fixture.session.error(),
        some(eq("Login failed. Please try again."))
    );
    assert_that!(fixture.session.is_authenticated(), eq(false));
}

#[tokio::test]
async fn given_failed_login_when_retrying_successfully_then_error_is_cleared() {
    // Given: A session whose last login failed
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Nope"})))
        .up_to_n_times(1)
        .mount(&fixture.server)
        .await;
    let _ = fixture.session.login("u1@example.com", "wrong").await;
    assert_that!(fixture.session.error(), some(anything()));

    // When: The next attempt succeeds
    mock_login(&fixture.server, &create_token("u1", "client", 3600), "client").await;
    fixture
        .session
        .login("u1@example.com", "right")
        .await
        .unwrap();

    // Then: The error slot is empty
    assert_that!(fixture.session.error(), none());
}

// =========================================================================
// Register
// =========================================================================

#[tokio::test]
async fn given_new_trainer_when_registering_then_navigates_to_onboarding() {
    // Given: The API accepts a trainer registration
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(json!({
            "name": "Tess",
            "email": "tess@example.com",
            "password": "secret",
            "role": "trainer"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": create_token("t9", "trainer", 3600),
            "user": user_json("t9", "trainer")
        })))
        .mount(&fixture.server)
        .await;

    // When: Registering
    let route = fixture
        .session
        .register("Tess", "tess@example.com", "secret", Role::Trainer)
        .await
        .unwrap();

    // Then: Onboarding comes first
    assert_that!(route, eq(Route::TrainerOnboarding));
    assert_that!(fixture.session.identity().unwrap().id.as_str(), eq("t9"));
    assert_that!(fixture.persisted_token(), some(anything()));
}

#[tokio::test]
async fn given_new_client_when_registering_then_navigates_to_dashboard() {
    // Given: The API accepts a client registration
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": create_token("c9", "client", 3600),
            "user": user_json("c9", "client")
        })))
        .mount(&fixture.server)
        .await;

    // When: Registering
    let route = fixture
        .session
        .register("Cleo", "c9@example.com", "secret", Role::Client)
        .await;

    // Then: The dashboard is requested
    assert_that!(route.unwrap(), eq(Route::Dashboard));
}

#[tokio::test]
async fn given_taken_email_when_registering_then_nested_error_message_is_surfaced() {
    // Given: The API reports the problem under error.message
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"message": "Email already registered"}
        })))
        .mount(&fixture.server)
        .await;

    // When: Registering
    let result = fixture
        .session
        .register("Cleo", "c9@example.com", "secret", Role::Client)
        .await;

    // Then: The nested message wins over the fallback
    assert_that!(result.is_err(), eq(true));
    assert_that!(
        fixture.session.error(),
        some(eq("Email already registered"))
    );
    assert_that!(fixture.session.is_authenticated(), eq(false));
}

// =========================================================================
// Logout
// =========================================================================

#[tokio::test]
async fn given_logged_in_session_when_logging_out_then_everything_is_cleared() {
    // Given: An authenticated session
    let fixture = TestFixture::logged_in("c1", "client").await;

    // When: Logging out
    let route = fixture.session.logout().await;

    // Then: Token, identity and bearer header are gone
    assert_that!(route, eq(Route::Landing));
    assert_that!(fixture.navigator.last(), some(eq(Route::Landing)));
    assert_that!(fixture.persisted_token(), none());
    assert_that!(fixture.session.identity(), none());
    assert_that!(fixture.api.has_bearer_token().await, eq(false));
}

#[tokio::test]
async fn given_anonymous_session_when_logging_out_then_still_navigates_to_landing() {
    // Given: Nobody is logged in
    let fixture = TestFixture::anonymous().await;

    // When: Logging out anyway
    let route = fixture.session.logout().await;

    // Then: Logout is unconditional
    assert_that!(route, eq(Route::Landing));
    assert_that!(fixture.session.is_authenticated(), eq(false));
}

#[tokio::test]
async fn given_subscriber_when_logging_out_then_it_observes_anonymous_identity() {
    // Given: A subscriber on an authenticated session
    let fixture = TestFixture::logged_in("c1", "client").await;
    let mut rx = fixture.session.subscribe();
    rx.borrow_and_update();

    // When: Logging out
    fixture.session.logout().await;

    // Then: The change is published
    assert_that!(rx.has_changed().unwrap(), eq(true));
    assert_that!(*rx.borrow(), none());
}

// =========================================================================
// Password reset
// =========================================================================

#[tokio::test]
async fn given_known_email_when_requesting_reset_then_succeeds_without_navigation() {
    // Given: The API accepts the request
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/forgot-password"))
        .and(body_json(json!({"email": "a@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
        .expect(1)
        .mount(&fixture.server)
        .await;

    // When: Requesting a reset email
    let result = fixture.session.forgot_password("a@example.com").await;

    // Then: No navigation happens
    assert_that!(result, ok(anything()));
    assert_that!(fixture.navigator.routes(), is_empty());
}

#[tokio::test]
async fn given_failed_reset_request_when_requesting_reset_then_fallback_message_is_used() {
    // Given: The API fails without a message
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/forgot-password"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&fixture.server)
        .await;

    // When: Requesting a reset email
    let result = fixture.session.forgot_password("a@example.com").await;

    // Then: The fallback is stored
    assert_that!(result.is_err(), eq(true));
    assert_that!(
        fixture.session.error(),
        some(eq("Failed to send reset email. Please try again."))
    );
}

#[tokio::test]
async fn given_valid_reset_token_when_resetting_password_then_navigates_to_login() {
    // Given: The API accepts the reset token
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/reset-password"))
        .and(body_json(json!({"token": "reset-123", "password": "new-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&fixture.server)
        .await;

    // When: Resetting the password
    let route = fixture
        .session
        .reset_password("reset-123", "new-secret")
        .await;

    // Then: The login page is requested
    assert_that!(route.unwrap(), eq(Route::Login));
    assert_that!(fixture.navigator.last(), some(eq(Route::Login)));
}

#[tokio::test]
async fn given_expired_reset_token_when_resetting_password_then_server_message_is_surfaced() {
    // Given: The API rejects the reset token
    let fixture = TestFixture::anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/users/reset-password"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Reset link expired"})),
        )
        .mount(&fixture.server)
        .await;

    // When: Resetting the password
    let result = fixture.session.reset_password("old", "new-secret").await;

    // Then: No navigation and the message is kept
    assert_that!(result.is_err(), eq(true));
    assert_that!(fixture.session.error(), some(eq("Reset link expired")));
    assert_that!(fixture.navigator.routes(), is_empty());
}

#[tokio::test]
async fn given_session_built_by_hand_when_restoring_then_uses_injected_store() {
    // Given: A session assembled without the fixture
    let server = MockServer::start().await;
    let token = create_token("a1", "admin", 3600);
    let tokens = Arc::new(MemoryTokenStore::with_token(token));
    let session = Session::new(
        Arc::new(ApiClient::new(&server.uri())),
        tokens,
        Arc::new(RecordingNavigator::new()),
    );

    // When: Restoring
    let identity = session.restore().await;

    // Then: The admin identity is picked up
    assert_that!(identity.unwrap().is_admin(), eq(true));
}
