use async_trait::async_trait;
use futures::future::join_all;
use http::StatusCode;
use mockall::mock;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use transport::testing::{RecordingNavigator, RecordingNotifier, Scripted, ScriptedBackend};
use transport::{
    ApiClient, ApiRequest, HttpBackend, Navigator, PreparedRequest, RawResponse, SessionHandle,
    TransportFailure,
};

use super::support::Harness;

mock! {
    pub Backend {}

    #[async_trait]
    impl HttpBackend for Backend {
        async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure>;
    }
}

#[tokio::test]
async fn test_bearer_token_is_attached_to_authenticated_requests() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|request| request.bearer.as_deref() == Some("token-abc") && request.url == "/customers?page=1")
        .times(1)
        .returning(|_| Ok(RawResponse::json(StatusCode::OK, &json!({"data": []}))));

    let session = SessionHandle::in_memory();
    session.establish("token-abc").await.unwrap();
    let client = ApiClient::new(
        Arc::new(backend),
        session,
        Arc::new(RecordingNotifier::new()),
        Arc::new(RecordingNavigator::default()),
    );

    let result: Value = client
        .get_json("/customers", transport::QueryParams::new().with("page", 1))
        .await
        .unwrap();
    assert_eq!(result["data"], json!([]));
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_token() {
    let harness = Harness::new(vec![Scripted::ok(json!({"token": "t"}))]);
    harness.session.establish("stale").await.unwrap();

    harness
        .client
        .send(ApiRequest::post("/auth/login").anonymous())
        .await
        .unwrap();

    assert_eq!(harness.backend.requests()[0].bearer, None);
}

#[tokio::test(start_paused = true)]
async fn test_token_is_read_at_dispatch_time_not_capture_time() {
    // Arrange: the first attempt fails and the token is refreshed during backoff
    let harness = Harness::new(vec![
        Scripted::status(StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        Scripted::ok(json!({})),
    ]);
    harness.session.establish("old-token").await.unwrap();

    let session = harness.session.clone();
    let refresher = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        session.establish("new-token").await.unwrap();
    });

    // Act
    harness.client.send(ApiRequest::get("/orders")).await.unwrap();
    refresher.await.unwrap();

    // Assert: the retry picked up the refreshed token
    let requests = harness.backend.requests();
    assert_eq!(requests[0].bearer.as_deref(), Some("old-token"));
    assert_eq!(requests[1].bearer.as_deref(), Some("new-token"));
}

#[tokio::test]
async fn test_concurrent_unauthorized_responses_redirect_once() {
    // Arrange
    let harness = Harness::with_backend(ScriptedBackend::always(Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({"message": "jwt expired"}),
    )));
    harness.session.establish("expired").await.unwrap();

    // Act: several different requests fail with 401 at the same time
    let requests = ["/customers", "/products", "/orders", "/offers", "/categories"]
        .into_iter()
        .map(|path| harness.client.send(ApiRequest::get(path)));
    let results = join_all(requests).await;

    // Assert
    assert!(results.iter().all(|r| r.as_ref().is_err_and(|e| e.is_unauthorized())));
    assert_eq!(harness.navigator.redirects(), 1);
    assert_eq!(harness.navigator.route(), transport::LOGIN_ROUTE);
    assert!(harness.session.bearer().is_none());
    assert!(!harness.session.is_authenticated());
    assert_eq!(harness.notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_on_login_page_does_not_redirect() {
    let backend = Arc::new(ScriptedBackend::always(Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({"message": "Invalid credentials"}),
    )));
    let navigator = Arc::new(RecordingNavigator::at(transport::LOGIN_ROUTE));
    let notifier = Arc::new(RecordingNotifier::new());
    let client = ApiClient::new(
        backend,
        SessionHandle::in_memory(),
        notifier.clone(),
        navigator.clone(),
    );

    let result = client.send(ApiRequest::post("/auth/login").anonymous()).await;

    assert!(result.is_err_and(|e| e.is_unauthorized()));
    assert_eq!(navigator.redirects(), 0);
    assert_eq!(notifier.errors(), vec!["Invalid credentials"]);
}

#[tokio::test]
async fn test_anonymous_unauthorized_shows_server_message_and_keeps_session() {
    // Arrange: an admin still signed in retries the login form from the dashboard
    let harness = Harness::new(vec![Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({"message": "Invalid email or password"}),
    )]);
    harness.session.establish("current").await.unwrap();

    // Act
    let result = harness
        .client
        .send(ApiRequest::post("/auth/login").anonymous())
        .await;

    // Assert
    assert!(result.is_err());
    assert_eq!(harness.notifier.errors(), vec!["Invalid email or password"]);
    assert_eq!(harness.navigator.redirects(), 0);
    assert_eq!(harness.session.bearer().as_deref(), Some("current"));
}

#[tokio::test]
async fn test_authenticated_unauthorized_on_login_page_is_reported() {
    // Arrange
    let harness = Harness::new(vec![Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({"message": "jwt expired"}),
    )]);
    harness.session.establish("expired").await.unwrap();
    harness.navigator.redirect_to_login().await;

    // Act
    let _ = harness.client.send(ApiRequest::get("/auth/me")).await;

    // Assert: cleared and reported, but no second redirect
    assert!(harness.session.bearer().is_none());
    assert_eq!(harness.navigator.redirects(), 1);
    assert_eq!(harness.notifier.errors(), vec!["jwt expired"]);
}

#[tokio::test]
async fn test_login_page_suppresses_redirect_for_later_session() {
    let harness = Harness::with_backend(ScriptedBackend::always(Scripted::status(
        StatusCode::UNAUTHORIZED,
        json!({}),
    )));

    harness.session.establish("first").await.unwrap();
    let _ = harness.client.send(ApiRequest::get("/orders")).await;
    assert_eq!(harness.navigator.redirects(), 1);

    harness.session.establish("second").await.unwrap();
    let _ = harness.client.send(ApiRequest::get("/orders")).await;
    // Navigator is now on /login, so the second 401 clears but does not redirect
    assert_eq!(harness.navigator.redirects(), 1);
    assert!(harness.session.bearer().is_none());
}
