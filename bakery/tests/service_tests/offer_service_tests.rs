use chrono::{Duration, Utc};
use serde_json::json;

use bakery::forms::{OfferForm, ValidationContext};
use bakery::model::DiscountType;
use bakery::services::{OfferService, ResourceService};
use bakery::stores::ListFilter;
use transport::testing::Scripted;

use crate::support::Harness;

#[tokio::test]
async fn test_list_prefers_camel_case_fields() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({
        "data": [
            {
                "id": 1,
                "name": "Spring",
                "productId": 12,
                "product_id": 3,
                "discountType": "percentage",
                "discount_value": "15",
                "start_time": "2030-03-01T00:00:00Z",
                "end_time": "2030-03-31T00:00:00Z",
                "isActive": true,
                "is_active": false
            },
            {
                "id": 2,
                "name": "Legacy",
                "product_id": 4,
                "discount_type": "fixed",
                "discount_value": 2,
                "start_time": "2030-01-01T00:00:00Z",
                "end_time": "2030-01-02T00:00:00Z"
            }
        ],
        "total": 2
    }))])
    .await;
    let service = OfferService::new(harness.client.clone());

    // Act
    let page = service.list(&ListFilter::default()).await.unwrap();

    // Assert
    assert_eq!(page.total, 2);
    assert_eq!(page.data[0].product_id, 12);
    assert_eq!(page.data[0].discount_value, 15.0);
    assert!(page.data[0].is_active);
    assert_eq!(page.data[1].product_id, 4);
    assert_eq!(page.data[1].discount_type, DiscountType::Fixed);
}

#[tokio::test]
async fn test_create_sends_snake_case_payload() {
    // Arrange
    let now = Utc::now();
    let start = now + Duration::hours(2);
    let end = now + Duration::days(3);
    let harness = Harness::new(vec![Scripted::ok(json!({
        "id": 10,
        "name": "Launch",
        "product_id": 7,
        "discount_type": "percentage",
        "discount_value": 25,
        "start_time": start,
        "end_time": end,
        "is_active": true
    }))])
    .await;
    let service = OfferService::new(harness.client.clone());
    let form = OfferForm {
        name: "Launch".into(),
        product_id: Some(7),
        discount_type: DiscountType::Percentage,
        discount_value: 25.0,
        start_time: Some(start),
        end_time: Some(end),
        is_active: true,
    };
    let payload = form.to_payload(&ValidationContext::create().at(now)).unwrap();

    // Act
    let created = service.create(&payload).await.unwrap();

    // Assert
    let body = harness.json_body(0);
    assert_eq!(body["product_id"], json!(7));
    assert_eq!(body["discount_type"], json!("percentage"));
    assert!(body.get("productId").is_none());
    assert_eq!(created.id, 10);
    assert_eq!(created.start_time, start);
}

#[tokio::test]
async fn test_record_without_product_is_a_decode_error() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!([{"id": 1, "name": "Broken"}]))]).await;
    let service = OfferService::new(harness.client.clone());

    // Act
    let result = service.active().await;

    // Assert
    let error = result.unwrap_err();
    assert!(error.to_string().contains("productId"));
    assert_eq!(harness.calls()[0].1, "/offers/active");
}

#[tokio::test]
async fn test_delete_targets_single_offer() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({}))]).await;
    let service = OfferService::new(harness.client.clone());

    // Act
    service.delete(42).await.unwrap();

    // Assert
    assert_eq!(harness.calls(), vec![("DELETE".to_string(), "/offers/42".to_string())]);
}
