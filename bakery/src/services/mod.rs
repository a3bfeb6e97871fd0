//! Per-resource REST services. Each one turns a resource-level call into an
//! [`ApiRequest`](transport::ApiRequest) on the shared client, logs failures
//! with context and hands the error back to the caller.

use async_trait::async_trait;
use std::future::Future;

use transport::ApiError;

use crate::errors::{Error, Result};
use crate::model::{Identified, ModelId, Paginated};
use crate::stores::ListFilter;

pub mod auth;
pub mod categories;
pub mod customers;
pub mod offers;
pub mod orders;
pub mod products;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use customers::CustomerService;
pub use offers::OfferService;
pub use orders::OrderService;
pub use products::ProductService;

/// CRUD surface a list store drives.
#[async_trait]
pub trait ResourceService: Send + Sync {
    type Item: Identified + Clone + Send + Sync + 'static;
    type Draft: Send + Sync + 'static;
    type Patch: Send + Sync + 'static;

    /// Plural resource name used in logs and notifications.
    fn resource(&self) -> &'static str;

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Self::Item>>;

    async fn create(&self, draft: &Self::Draft) -> Result<Self::Item>;

    async fn update(&self, id: ModelId, patch: &Self::Patch) -> Result<Self::Item>;

    async fn delete(&self, _id: ModelId) -> Result<()> {
        Err(Error::Unsupported("delete"))
    }

    async fn delete_many(&self, _ids: &[ModelId]) -> Result<()> {
        Err(Error::Unsupported("bulk delete"))
    }

    /// Local approximation of `update`, applied before the server answers.
    fn apply_patch(&self, _item: &mut Self::Item, _patch: &Self::Patch) {}
}

pub(crate) fn log_failure(resource: &str, action: &str, error: &Error) {
    if error.is_cancelled() {
        tracing::debug!(resource, action, "Service call cancelled");
    } else {
        tracing::error!(resource, action, error = %error, "Service call failed");
    }
}

/// Awaits a transport call, converting and logging its failure.
pub(crate) async fn logged<T>(
    resource: &'static str,
    action: &'static str,
    call: impl Future<Output = std::result::Result<T, ApiError>>,
) -> Result<T> {
    call.await
        .map_err(Error::from)
        .inspect_err(|e| log_failure(resource, action, e))
}

#[derive(serde::Serialize)]
pub(crate) struct IdList<'a> {
    pub ids: &'a [ModelId],
}
