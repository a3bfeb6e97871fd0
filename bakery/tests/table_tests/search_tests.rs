use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use bakery::stores::SortDirection;
use bakery::views::TableController;
use transport::testing::Scripted;

use crate::support::{Harness, customer, page};

const DEBOUNCE: Duration = Duration::from_millis(400);

#[tokio::test(start_paused = true)]
async fn test_search_burst_commits_once() {
    // Arrange
    let harness = Harness::new(vec![page(vec![customer(1, "Ada")])]).await;
    let table = Arc::new(TableController::new(Arc::new(harness.customer_store()), DEBOUNCE));

    // Act
    let mut handles = Vec::new();
    for term in ["a", "ad", "ada "] {
        let table = table.clone();
        handles.push(tokio::spawn(async move { table.on_search_input(term).await }));
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    let mut committed = Vec::new();
    for handle in handles {
        committed.push(handle.await.unwrap().unwrap());
    }

    // Assert
    assert_eq!(committed, vec![false, false, true]);
    assert_eq!(
        harness.calls(),
        vec![(
            "GET".to_string(),
            "/customers?limit=10&page=1&searchTerm=ada&sortOrder=asc".to_string()
        )]
    );
    assert_eq!(table.store().filter().await.search_term, "ada");
}

#[tokio::test(start_paused = true)]
async fn test_repeating_current_search_does_not_reload() {
    // Arrange
    let harness = Harness::new(vec![page(vec![customer(1, "Ada")])]).await;
    let table = TableController::new(Arc::new(harness.customer_store()), DEBOUNCE);
    table.on_search_input("ada").await.unwrap();

    // Act
    let reloaded = table.on_search_input(" ada").await.unwrap();

    // Assert
    assert!(!reloaded);
    assert_eq!(harness.backend.request_count(), 1);
}

#[tokio::test]
async fn test_sorting_returns_to_first_page() {
    // Arrange
    let harness = Harness::new(vec![
        page(vec![customer(21, "Uma")]),
        page(vec![customer(1, "Ada")]),
        page(vec![customer(9, "Zed")]),
    ])
    .await;
    let table = TableController::new(Arc::new(harness.customer_store()), DEBOUNCE);
    table.go_to_page(3).await.unwrap();

    // Act
    table.sort_by("name").await.unwrap();
    table.sort_by("name").await.unwrap();

    // Assert
    let urls: Vec<String> = harness.calls().into_iter().map(|(_, url)| url).collect();
    assert_eq!(
        urls,
        vec![
            "/customers?limit=10&page=3&sortOrder=asc",
            "/customers?limit=10&page=1&sortBy=name&sortOrder=asc",
            "/customers?limit=10&page=1&sortBy=name&sortOrder=desc",
        ]
    );
    assert_eq!(table.sort_state().await.direction, SortDirection::Desc);
}

#[tokio::test]
async fn test_export_writes_current_page() {
    // Arrange
    let harness = Harness::new(vec![Scripted::ok(json!({
        "data": [{"id": 4, "name": "Lovelace, Ada", "email": "ada@example.com", "city": "London"}],
        "total": 1
    }))])
    .await;
    let table = TableController::new(Arc::new(harness.customer_store()), DEBOUNCE);
    table.store().load().await.unwrap();

    // Act
    let csv = table.export_csv().await;

    // Assert
    assert_eq!(
        csv,
        "id,name,email,phone,city,country,created_at\n4,\"Lovelace, Ada\",ada@example.com,,London,,\n"
    );
}
