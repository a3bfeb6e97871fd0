use serde_json::json;

use bakery::forms::OrderForm;
use bakery::model::Product;
use bakery::services::{OrderService, ResourceService};
use bakery::stores::{FilterPatch, ListFilter};
use transport::testing::Scripted;

use crate::support::Harness;

#[tokio::test]
async fn test_create_submits_order_and_items_in_one_payload() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({
        "id": 1,
        "order_number": "ORD-240101-1000",
        "customer_id": 8,
        "items": [{"product_id": 5, "quantity": 3, "unit_price": 12.5}]
    }))])
    .await;
    let service = OrderService::new(harness.client.clone());
    let product: Product = serde_json::from_value(json!({
        "id": 5, "name": "Tart", "slug": "tart", "price": 12.5
    }))
    .unwrap();
    let mut form = OrderForm::default();
    form.customer_id = Some(8);
    form.add_product(&product, 3);

    // Act
    service.create(&form.to_payload().unwrap()).await.unwrap();

    // Assert
    let body = harness.json_body(0);
    assert_eq!(harness.calls()[0].1, "/orders");
    assert_eq!(body["customer_id"], json!(8));
    assert_eq!(body["status"], json!("new"));
    assert_eq!(
        body["items"],
        json!([{"product_id": 5, "quantity": 3, "unit_price": 12.5, "total": 37.5}])
    );
    assert!(body["order_number"].as_str().unwrap().starts_with("ORD-"));
}

#[tokio::test]
async fn test_invoice_and_export_return_raw_bytes() {
    // Arrange
    let harness = Harness::new(vec![
        Scripted::bytes(b"%PDF-1.7"),
        Scripted::bytes(b"id,status\n1,new\n"),
    ])
    .await;
    let service = OrderService::new(harness.client.clone());
    let filter = ListFilter::default()
        .merged(FilterPatch::new().page(4).search("ada").extra("status", "new"));

    // Act
    let invoice = service.invoice(12).await.unwrap();
    let export = service.export(&filter).await.unwrap();

    // Assert
    assert_eq!(invoice, b"%PDF-1.7");
    assert_eq!(export, b"id,status\n1,new\n");
    assert_eq!(harness.calls()[0].1, "/orders/12/invoice");
    assert_eq!(
        harness.calls()[1].1,
        "/orders/export?searchTerm=ada&sortOrder=asc&status=new"
    );
}

#[tokio::test]
async fn test_history_notes_and_confirmation() {
    // Arrange
    let harness = Harness::new(vec![
        Scripted::ok(json!({"data": [{"status": "new", "note": "Created"}, {"status": "shipped"}]})),
        Scripted::ok(json!({})),
        Scripted::ok(json!({})),
    ])
    .await;
    let service = OrderService::new(harness.client.clone());

    // Act
    let history = service.history(3).await.unwrap();
    service.add_note(3, "Left at the door").await.unwrap();
    service.send_confirmation(3).await.unwrap();

    // Assert
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].note.as_deref(), Some("Created"));
    assert_eq!(harness.json_body(1), json!({"note": "Left at the door"}));
    assert_eq!(
        harness.calls(),
        vec![
            ("GET".to_string(), "/orders/3/history".to_string()),
            ("POST".to_string(), "/orders/3/notes".to_string()),
            ("POST".to_string(), "/orders/3/send-confirmation".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_bulk_delete_carries_ids_in_body() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({}))]).await;
    let service = OrderService::new(harness.client.clone());

    // Act
    service.delete_many(&[4, 5]).await.unwrap();

    // Assert
    assert_eq!(harness.calls()[0], ("DELETE".to_string(), "/orders".to_string()));
    assert_eq!(harness.json_body(0), json!({"ids": [4, 5]}));
}
