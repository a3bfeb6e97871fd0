use async_trait::async_trait;
use http::StatusCode;
use mockall::{mock, predicate};
use serde_json::json;
use std::sync::Arc;

use bakery::errors::{Error, Result};
use bakery::forms::CustomerForm;
use bakery::model::{Customer, ModelId, Paginated};
use bakery::services::ResourceService;
use bakery::stores::{BulkDeleteOutcome, ListFilter, ResourceStore};
use transport::testing::{RecordingNotifier, Scripted};
use transport::{ApiError, SessionHandle};

use crate::support::{Harness, customer, page};

mock! {
    pub Customers {}

    #[async_trait]
    impl ResourceService for Customers {
        type Item = Customer;
        type Draft = CustomerForm;
        type Patch = CustomerForm;

        fn resource(&self) -> &'static str;
        async fn list(&self, filter: &ListFilter) -> Result<Paginated<Customer>>;
        async fn create(&self, draft: &CustomerForm) -> Result<Customer>;
        async fn update(&self, id: ModelId, patch: &CustomerForm) -> Result<Customer>;
        async fn delete(&self, id: ModelId) -> Result<()>;
        async fn delete_many(&self, ids: &[ModelId]) -> Result<()>;
    }
}

#[tokio::test]
async fn test_bulk_success_reports_all_succeeded() {
    // Arrange
    let harness = Harness::new(vec![
        Scripted::ok(json!({"deleted": 3})),
        page(vec![customer(4, "Dora")]),
    ])
    .await;
    let store = harness.customer_store();

    // Act
    let outcome = store.bulk_delete(&[1, 2, 3]).await.unwrap();

    // Assert
    assert_eq!(outcome, BulkDeleteOutcome::AllSucceeded(3));
    assert_eq!(harness.json_body(0), json!({"ids": [1, 2, 3]}));
    assert_eq!(harness.notifier.successes(), vec!["Deleted 3 customers"]);
    assert_eq!(harness.backend.request_count(), 2);
}

#[tokio::test]
async fn test_bulk_failure_falls_back_to_single_deletes() {
    // Arrange
    let harness = Harness::new(vec![
        Scripted::status(StatusCode::BAD_REQUEST, json!({"message": "Bulk delete disabled"})),
        Scripted::ok(json!({})),
        Scripted::status(
            StatusCode::BAD_REQUEST,
            json!({"code": "23503", "detail": "still referenced"}),
        ),
        Scripted::ok(json!({})),
        page(vec![customer(2, "Bea")]),
    ])
    .await;
    let store = harness.customer_store();

    // Act
    let outcome = store.bulk_delete(&[1, 2, 3]).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        BulkDeleteOutcome::Partial {
            succeeded: 2,
            failed: 1,
            total: 3
        }
    );
    assert_eq!(harness.json_body(1), json!({"ids": [1]}));
    assert_eq!(harness.json_body(2), json!({"ids": [2]}));
    assert_eq!(harness.json_body(3), json!({"ids": [3]}));

    let errors = harness.notifier.errors();
    assert!(errors.contains(&"Bulk delete disabled".to_string()));
    assert!(errors.contains(&"Deleted 2 of 3 customers".to_string()));
    assert!(errors.iter().any(|e| e.contains("still referenced by other records")));
    assert!(harness.notifier.successes().is_empty());

    let items = store.items().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 2);
}

#[tokio::test]
async fn test_every_single_delete_failing_reports_all_failed() {
    // Arrange
    let harness = Harness::new(vec![
        Scripted::status(StatusCode::NOT_FOUND, json!({})),
        Scripted::status(StatusCode::FORBIDDEN, json!({})),
        Scripted::status(StatusCode::FORBIDDEN, json!({})),
        page(vec![customer(1, "Ada"), customer(2, "Bea")]),
    ])
    .await;
    let store = harness.customer_store();

    // Act
    let outcome = store.bulk_delete(&[1, 2]).await.unwrap();

    // Assert
    assert_eq!(outcome, BulkDeleteOutcome::AllFailed(2));
    assert_eq!(outcome.succeeded(), 0);
    assert!(
        harness
            .notifier
            .errors()
            .contains(&"Could not delete any of the 2 selected customers".to_string())
    );
}

#[tokio::test]
async fn test_unsupported_bulk_endpoint_uses_single_deletes_quietly() {
    // Arrange
    let mut service = MockCustomers::new();
    service.expect_resource().return_const("customers");
    service
        .expect_delete_many()
        .times(1)
        .returning(|_| Err(Error::Unsupported("bulk delete")));
    service.expect_delete().times(2).returning(|_| Ok(()));
    service
        .expect_list()
        .times(1)
        .returning(|_| Ok(Paginated::default()));

    let notifier = Arc::new(RecordingNotifier::new());
    let store = ResourceStore::new(Arc::new(service), SessionHandle::in_memory(), notifier.clone());

    // Act
    let outcome = store.bulk_delete(&[7, 8]).await.unwrap();

    // Assert
    assert_eq!(outcome, BulkDeleteOutcome::AllSucceeded(2));
    assert_eq!(notifier.successes(), vec!["Deleted 2 customers"]);
    assert!(notifier.errors().is_empty());
}

#[tokio::test]
async fn test_cancelled_bulk_call_is_not_a_partial_failure() {
    // Arrange
    let mut service = MockCustomers::new();
    service.expect_resource().return_const("customers");
    service
        .expect_delete_many()
        .times(1)
        .returning(|_| Err(Error::Api(ApiError::Cancelled)));
    service.expect_delete().never();
    service.expect_list().never();

    let notifier = Arc::new(RecordingNotifier::new());
    let store = ResourceStore::new(Arc::new(service), SessionHandle::in_memory(), notifier.clone());

    // Act
    let result = store.bulk_delete(&[1, 2]).await;

    // Assert
    assert!(result.unwrap_err().is_cancelled());
    assert!(notifier.errors().is_empty());
    assert!(notifier.successes().is_empty());
}

#[tokio::test]
async fn test_cancelled_fallback_drops_rows_already_deleted() {
    // Arrange
    let rows: Vec<Customer> = [customer(1, "Ada"), customer(2, "Bo"), customer(3, "Cy")]
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap())
        .collect();
    let mut service = MockCustomers::new();
    service.expect_resource().return_const("customers");
    service.expect_list().times(1).returning(move |_| {
        Ok(Paginated {
            data: rows.clone(),
            total: 3,
            ..Paginated::default()
        })
    });
    service
        .expect_delete_many()
        .times(1)
        .returning(|_| Err(Error::Unsupported("bulk delete")));
    service
        .expect_delete()
        .with(predicate::eq(1))
        .times(1)
        .returning(|_| Ok(()));
    service
        .expect_delete()
        .with(predicate::eq(2))
        .times(1)
        .returning(|_| Err(Error::Api(ApiError::Cancelled)));
    service.expect_delete().with(predicate::eq(3)).never();

    let notifier = Arc::new(RecordingNotifier::new());
    let store = ResourceStore::new(Arc::new(service), SessionHandle::in_memory(), notifier.clone());
    store.load().await.unwrap();

    // Act
    let result = store.bulk_delete(&[1, 2, 3]).await;

    // Assert
    assert!(result.unwrap_err().is_cancelled());
    let remaining: Vec<ModelId> = store.items().await.iter().map(|c| c.id).collect();
    assert_eq!(remaining, vec![2, 3]);
    assert!(notifier.errors().is_empty());
}
