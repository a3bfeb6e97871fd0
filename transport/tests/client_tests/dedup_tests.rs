use serde_json::{Value, json};
use std::time::Duration;

use transport::testing::Scripted;
use transport::{ApiError, ApiRequest};

use super::support::Harness;

fn submit_order() -> ApiRequest {
    ApiRequest::post("/orders")
        .json(&json!({"customer_id": 7, "items": [{"product_id": 1, "quantity": 2}]}))
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_identical_request_supersedes_in_flight_one() {
    // Arrange: both replies are slow enough for the requests to overlap
    let harness = Harness::new(vec![
        Scripted::ok(json!({"id": 1})).after(Duration::from_millis(500)),
        Scripted::ok(json!({"id": 2})).after(Duration::from_millis(500)),
    ]);

    // Act: fire the first request, then an identical one before it resolves
    let client = harness.client.clone();
    let first = tokio::spawn(async move { client.send_json::<Value>(submit_order()).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = harness.client.send_json::<Value>(submit_order()).await;
    let first = first.await.unwrap();

    // Assert: the earlier one was aborted, only the newest completed
    assert!(matches!(first, Err(ApiError::Cancelled)));
    assert_eq!(second.unwrap()["id"], 2);
    assert_eq!(harness.backend.request_count(), 2);
    assert_eq!(harness.backend.completed(), 1);
    assert!(harness.notifier.errors().is_empty(), "cancellation must not toast");
    assert_eq!(harness.client.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_different_bodies_are_not_deduplicated() {
    let harness = Harness::new(vec![
        Scripted::ok(json!({"id": 1})).after(Duration::from_millis(100)),
        Scripted::ok(json!({"id": 2})).after(Duration::from_millis(100)),
    ]);

    let a = harness
        .client
        .send_json::<Value>(ApiRequest::post("/orders").json(&json!({"n": 1})).unwrap());
    let b = harness
        .client
        .send_json::<Value>(ApiRequest::post("/orders").json(&json!({"n": 2})).unwrap());
    let (a, b) = tokio::join!(a, b);

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(harness.backend.completed(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_all_rejects_pending_requests_silently() {
    let harness = Harness::new(vec![
        Scripted::ok(json!([])).after(Duration::from_secs(5)),
    ]);

    let client = harness.client.clone();
    let pending = tokio::spawn(async move { client.send(ApiRequest::get("/customers")).await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(harness.client.cancel_all(), 1);
    let result = pending.await.unwrap();

    assert!(matches!(result, Err(ApiError::Cancelled)));
    assert!(harness.notifier.errors().is_empty());
}
