use http::StatusCode;
use serde_json::json;
use std::time::Duration;

use bakery::stores::{FilterPatch, SortDirection};
use transport::testing::Scripted;

use crate::support::{Harness, customer, page};

#[tokio::test]
async fn test_set_filter_merges_then_reloads() {
    // Arrange
    let harness = Harness::new(vec![
        page(vec![customer(1, "Ada")]),
        page(vec![customer(2, "Bea")]),
    ])
    .await;
    let store = harness.customer_store();

    // Act
    store
        .set_filter(FilterPatch::new().search("ada").sort("name", SortDirection::Desc))
        .await
        .unwrap();
    store.set_filter(FilterPatch::new().page(2)).await.unwrap();

    // Assert
    let calls = harness.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].1,
        "/customers?limit=10&page=2&searchTerm=ada&sortBy=name&sortOrder=desc"
    );
    let state = store.snapshot().await;
    assert_eq!(state.items[0].name, "Bea");
    assert_eq!(state.filter.search_term, "ada");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_empty_search_term_is_not_sent() {
    // Arrange
    let harness = Harness::new(vec![page(vec![])]).await;
    let store = harness.customer_store();

    // Act
    store
        .set_filter(FilterPatch::new().search("").sort("name", SortDirection::Asc))
        .await
        .unwrap();

    // Assert
    let url = &harness.calls()[0].1;
    assert!(!url.contains("searchTerm"));
    assert!(url.contains("sortBy=name"));
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    // Arrange: the first load answers after the second one.
    let harness = Harness::new(vec![
        page(vec![customer(1, "Stale")]).after(Duration::from_millis(300)),
        page(vec![customer(2, "Fresh")]).after(Duration::from_millis(20)),
    ])
    .await;
    let store = harness.customer_store();

    // Act
    let (first, second) = tokio::join!(
        store.set_filter(FilterPatch::new().search("s")),
        store.set_filter(FilterPatch::new().search("fr")),
    );

    // Assert
    assert!(!first.unwrap());
    assert!(second.unwrap());
    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "Fresh");
    assert_eq!(state.filter.search_term, "fr");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_failed_load_keeps_items_and_records_error() {
    // Arrange
    let harness = Harness::new(vec![
        page(vec![customer(1, "Ada")]),
        Scripted::status(StatusCode::INTERNAL_SERVER_ERROR, json!({})),
    ])
    .await;
    let store = harness.customer_store();
    store.load().await.unwrap();

    // Act
    let result = store.set_filter(FilterPatch::new().page(2)).await;

    // Assert
    assert!(result.is_err());
    let state = store.snapshot().await;
    assert_eq!(state.items.len(), 1);
    assert!(state.error.is_some());
    assert!(!state.loading);
    assert_eq!(harness.notifier.errors().len(), 1);
}
