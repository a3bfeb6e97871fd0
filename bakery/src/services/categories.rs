use async_trait::async_trait;
use std::sync::Arc;

use transport::{ApiClient, ApiRequest};

use super::{ResourceService, logged};
use crate::errors::Result;
use crate::forms::CategoryForm;
use crate::model::{Category, ModelId, Paginated, Single};
use crate::stores::ListFilter;

const RESOURCE: &str = "categories";

pub struct CategoryService {
    client: Arc<ApiClient>,
}

impl CategoryService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceService for CategoryService {
    type Item = Category;
    type Draft = CategoryForm;
    type Patch = CategoryForm;

    fn resource(&self) -> &'static str {
        RESOURCE
    }

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Category>> {
        let query = filter.to_query()?;
        logged(RESOURCE, "list", self.client.get_json("/categories", query)).await
    }

    async fn create(&self, form: &CategoryForm) -> Result<Category> {
        let request = ApiRequest::post("/categories").multipart(form.to_parts());
        let created: Single<Category> =
            logged(RESOURCE, "create", self.client.send_json(request)).await?;
        Ok(created.into_inner())
    }

    async fn update(&self, id: ModelId, form: &CategoryForm) -> Result<Category> {
        let request = ApiRequest::patch(format!("/categories/{id}")).multipart(form.to_parts());
        let updated: Single<Category> =
            logged(RESOURCE, "update", self.client.send_json(request)).await?;
        Ok(updated.into_inner())
    }

    fn apply_patch(&self, category: &mut Category, form: &CategoryForm) {
        form.apply_to(category);
    }
}
