use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use bakery::stores::BulkDeleteOutcome;
use bakery::views::TableController;
use transport::testing::Scripted;

use crate::support::{Harness, customer, page};

fn table(harness: &Harness) -> TableController<bakery::services::CustomerService> {
    TableController::new(Arc::new(harness.customer_store()), Duration::from_millis(400))
}

#[tokio::test]
async fn test_page_change_clears_selection() {
    // Arrange
    let harness = Harness::new(vec![
        page(vec![customer(1, "Ada"), customer(2, "Bo")]),
        page(vec![customer(3, "Cy")]),
    ])
    .await;
    let table = table(&harness);
    table.store().load().await.unwrap();
    table.toggle_page_selection().await;
    assert_eq!(table.selection().await.ids(), vec![1, 2]);

    // Act
    table.go_to_page(2).await.unwrap();

    // Assert
    assert!(table.selection().await.is_empty());
}

#[tokio::test]
async fn test_successful_bulk_delete_clears_selection() {
    // Arrange
    let harness = Harness::new(vec![
        page(vec![customer(1, "Ada"), customer(2, "Bo"), customer(3, "Cy")]),
        Scripted::ok(json!({})),
        page(vec![customer(3, "Cy")]),
    ])
    .await;
    let table = table(&harness);
    table.store().load().await.unwrap();
    table.toggle_row(1).await;
    table.toggle_row(2).await;

    // Act
    let outcome = table.delete_selected().await.unwrap();

    // Assert
    assert_eq!(outcome, BulkDeleteOutcome::AllSucceeded(2));
    assert!(table.selection().await.is_empty());
    assert_eq!(harness.json_body(1), json!({"ids": [1, 2]}));
    assert_eq!(harness.notifier.successes(), vec!["Deleted 2 customers".to_string()]);
}

#[tokio::test]
async fn test_partial_bulk_delete_keeps_survivors_selected() {
    // Arrange: the bulk call fails, then the per-row fallback deletes only id 1.
    let harness = Harness::new(vec![
        page(vec![customer(1, "Ada"), customer(2, "Bo")]),
        Scripted::status(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})),
        Scripted::ok(json!({})),
        Scripted::status(StatusCode::CONFLICT, json!({"message": "in use"})),
        page(vec![customer(2, "Bo")]),
    ])
    .await;
    let table = table(&harness);
    table.store().load().await.unwrap();
    table.toggle_page_selection().await;

    // Act
    let outcome = table.delete_selected().await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        BulkDeleteOutcome::Partial {
            succeeded: 1,
            failed: 1,
            total: 2
        }
    );
    assert_eq!(table.selection().await.ids(), vec![2]);
}
