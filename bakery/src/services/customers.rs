use async_trait::async_trait;
use std::sync::Arc;

use transport::{ApiClient, ApiRequest};

use super::{IdList, ResourceService, logged};
use crate::errors::Result;
use crate::forms::CustomerForm;
use crate::model::{Customer, ModelId, Paginated, Single};
use crate::stores::ListFilter;

const RESOURCE: &str = "customers";

pub struct CustomerService {
    client: Arc<ApiClient>,
}

impl CustomerService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// JSON unless a new image is attached, in which case multipart.
    fn write_request(request: ApiRequest, form: &CustomerForm) -> Result<ApiRequest> {
        if form.has_upload() {
            Ok(request.multipart(form.to_parts()))
        } else {
            Ok(request.json(&form.to_payload())?)
        }
    }
}

#[async_trait]
impl ResourceService for CustomerService {
    type Item = Customer;
    type Draft = CustomerForm;
    type Patch = CustomerForm;

    fn resource(&self) -> &'static str {
        RESOURCE
    }

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Customer>> {
        let query = filter.to_query()?;
        logged(RESOURCE, "list", self.client.get_json("/customers", query)).await
    }

    async fn create(&self, form: &CustomerForm) -> Result<Customer> {
        let request = Self::write_request(ApiRequest::post("/customers"), form)?;
        let created: Single<Customer> =
            logged(RESOURCE, "create", self.client.send_json(request)).await?;
        Ok(created.into_inner())
    }

    async fn update(&self, id: ModelId, form: &CustomerForm) -> Result<Customer> {
        let request = Self::write_request(ApiRequest::put(format!("/customers/{id}")), form)?;
        let updated: Single<Customer> =
            logged(RESOURCE, "update", self.client.send_json(request)).await?;
        Ok(updated.into_inner())
    }

    /// The endpoint only takes id lists; a single delete is a list of one.
    async fn delete(&self, id: ModelId) -> Result<()> {
        let request = ApiRequest::delete("/customers").json(&IdList { ids: &[id] })?;
        logged(RESOURCE, "delete", self.client.send_unit(request)).await
    }

    async fn delete_many(&self, ids: &[ModelId]) -> Result<()> {
        let request = ApiRequest::delete("/customers").json(&IdList { ids })?;
        logged(RESOURCE, "delete_many", self.client.send_unit(request)).await
    }

    fn apply_patch(&self, customer: &mut Customer, form: &CustomerForm) {
        form.apply_to(customer);
    }
}
