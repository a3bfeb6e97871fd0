use http::StatusCode;
use serde_json::json;
use std::time::Duration;

use bakery::model::RegisterRequest;
use bakery::services::AuthService;
use bakery::stores::AuthStore;
use transport::ApiRequest;
use transport::testing::Scripted;

use crate::support::Harness;

#[tokio::test]
async fn test_login_establishes_session_without_sending_a_token() {
    // Arrange
    let harness = Harness::anonymous(vec![Scripted::ok(json!({"accessToken": "fresh-token"}))]);
    let auth = AuthService::new(harness.client.clone());

    // Act
    auth.login(" ada@example.com ", "secret").await.unwrap();

    // Assert
    let request = &harness.backend.requests()[0];
    assert_eq!(request.url, "/auth/login");
    assert_eq!(request.bearer, None);
    assert_eq!(harness.json_body(0), json!({"email": "ada@example.com", "password": "secret"}));
    assert_eq!(harness.session.bearer().as_deref(), Some("fresh-token"));
    assert!(harness.session.is_authenticated());
}

#[tokio::test]
async fn test_failed_login_leaves_session_empty() {
    // Arrange
    let harness = Harness::anonymous(vec![Scripted::status(
        StatusCode::BAD_REQUEST,
        json!({"message": "Invalid credentials"}),
    )]);
    let store = AuthStore::new(harness.client.clone());

    // Act
    let result = store.login("ada@example.com", "wrong").await;

    // Assert
    assert!(result.is_err());
    assert!(!store.is_authenticated());
    assert_eq!(harness.notifier.errors(), vec!["Invalid credentials"]);
    assert!(harness.notifier.successes().is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_show_server_message() {
    // Arrange
    let harness = Harness::anonymous(vec![Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({"message": "Invalid email or password"}),
    )]);
    let store = AuthStore::new(harness.client.clone());

    // Act
    let result = store.login("ada@example.com", "wrong").await;

    // Assert
    assert!(result.is_err());
    assert!(!store.is_authenticated());
    assert_eq!(harness.notifier.errors(), vec!["Invalid email or password"]);
    assert_eq!(harness.navigator.redirects(), 0);
}

#[tokio::test]
async fn test_register_without_token_does_not_log_in() {
    // Arrange
    let harness = Harness::anonymous(vec![Scripted::ok(json!({"id": 5, "email": "bea@example.com"}))]);
    let auth = AuthService::new(harness.client.clone());

    // Act
    let response = auth
        .register(&RegisterRequest {
            name: "Bea".into(),
            email: "bea@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    // Assert
    assert!(response.is_none());
    assert!(!harness.session.is_authenticated());
}

#[tokio::test]
async fn test_refresh_replaces_token() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({"token": "second"}))]).await;
    let auth = AuthService::new(harness.client.clone());
    let epoch = harness.session.epoch();

    // Act
    auth.refresh_token().await.unwrap();

    // Assert
    assert_eq!(harness.backend.requests()[0].bearer.as_deref(), Some("opaque-admin-token"));
    assert_eq!(harness.session.bearer().as_deref(), Some("second"));
    assert_eq!(harness.session.epoch(), epoch + 1);
}

#[tokio::test(start_paused = true)]
async fn test_logout_cancels_in_flight_requests_and_clears_session() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({})).after(Duration::from_secs(5))]).await;
    let store = AuthStore::new(harness.client.clone());
    let client = harness.client.clone();
    let pending = tokio::spawn(async move { client.send(ApiRequest::get("/orders")).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Act
    store.logout().await.unwrap();

    // Assert
    let result = pending.await.unwrap();
    assert!(result.unwrap_err().is_cancelled());
    assert!(!store.is_authenticated());
    assert_eq!(harness.session.bearer(), None);
    assert!(harness.notifier.errors().is_empty());
    assert_eq!(harness.notifier.successes(), vec!["Logged out"]);
}

#[tokio::test]
async fn test_password_reset_flow_is_anonymous() {
    // Arrange
    let harness = Harness::anonymous(vec![Scripted::ok(json!({})), Scripted::ok(json!({}))]);
    let auth = AuthService::new(harness.client.clone());

    // Act
    auth.forgot_password("ada@example.com").await.unwrap();
    auth.reset_password("reset-123", "new-secret").await.unwrap();

    // Assert
    assert_eq!(harness.calls()[0].1, "/auth/forgot-password");
    assert_eq!(
        harness.json_body(1),
        json!({"token": "reset-123", "newPassword": "new-secret"})
    );
}
