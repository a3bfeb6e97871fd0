use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

use transport::testing::Scripted;
use transport::{ApiError, ApiRequest, FormPart, RequestBody};

use super::support::Harness;

#[derive(Debug, Deserialize)]
struct Product {
    id: i64,
    name: String,
}

#[tokio::test]
async fn test_typed_decoding() {
    let harness = Harness::new(vec![Scripted::ok(json!({"id": 3, "name": "Sourdough"}))]);

    let product: Product = harness
        .client
        .get_json("/products/3", Default::default())
        .await
        .unwrap();

    assert_eq!(product.id, 3);
    assert_eq!(product.name, "Sourdough");
}

#[tokio::test]
async fn test_empty_body_decodes_as_unit() {
    let harness = Harness::new(vec![Scripted::bytes(b"")]);

    let result: Result<(), ApiError> = harness.client.delete_json("/products/3").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let harness = Harness::new(vec![Scripted::bytes(b"<html>")]);

    let result: Result<Product, ApiError> =
        harness.client.get_json("/products/3", Default::default()).await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
    assert_eq!(harness.notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_constraint_code_message_is_surfaced() {
    let harness = Harness::new(vec![Scripted::status(
        StatusCode::CONFLICT,
        json!({"code": "23505"}),
    )]);

    let result = harness.client.send(ApiRequest::post("/categories")).await;

    assert_eq!(result.unwrap_err().code().as_deref(), Some("23505"));
    assert_eq!(
        harness.notifier.errors(),
        vec![transport::messages::constraint_message("23505").unwrap().to_string()]
    );
}

#[tokio::test]
async fn test_multipart_body_reaches_backend_unchanged() {
    let harness = Harness::new(vec![Scripted::ok(json!({"id": 1}))]);
    let parts = vec![
        FormPart::text("name", "Rye"),
        FormPart::file("image", "rye.png", "image/png", vec![1, 2, 3]),
    ];

    harness
        .client
        .send(ApiRequest::post("/categories").multipart(parts.clone()))
        .await
        .unwrap();

    assert_eq!(harness.backend.requests()[0].body, RequestBody::Multipart(parts));
}
