use async_trait::async_trait;
use std::sync::Arc;

use transport::{ApiClient, ApiRequest, QueryParams};

use super::{IdList, ResourceService, logged};
use crate::errors::Result;
use crate::forms::ProductForm;
use crate::model::{ModelId, Paginated, Product, Single};
use crate::stores::ListFilter;

const RESOURCE: &str = "products";

pub struct ProductService {
    client: Arc<ApiClient>,
}

impl ProductService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: ModelId) -> Result<Product> {
        let product: Single<Product> = logged(
            RESOURCE,
            "get",
            self.client.get_json(&format!("/products/{id}"), QueryParams::new()),
        )
        .await?;
        Ok(product.into_inner())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Product> {
        let path = format!("/products/slug/{}", transport::query::encode_uri_component(slug));
        let product: Single<Product> = logged(
            RESOURCE,
            "get_by_slug",
            self.client.get_json(&path, QueryParams::new()),
        )
        .await?;
        Ok(product.into_inner())
    }
}

#[async_trait]
impl ResourceService for ProductService {
    type Item = Product;
    type Draft = ProductForm;
    type Patch = ProductForm;

    fn resource(&self) -> &'static str {
        RESOURCE
    }

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Product>> {
        let query = filter.to_query()?;
        logged(RESOURCE, "list", self.client.get_json("/products", query)).await
    }

    async fn create(&self, form: &ProductForm) -> Result<Product> {
        let request = ApiRequest::post("/products").multipart(form.to_parts());
        let created: Single<Product> =
            logged(RESOURCE, "create", self.client.send_json(request)).await?;
        Ok(created.into_inner())
    }

    async fn update(&self, id: ModelId, form: &ProductForm) -> Result<Product> {
        let request = ApiRequest::put(format!("/products/{id}")).multipart(form.to_parts());
        let updated: Single<Product> =
            logged(RESOURCE, "update", self.client.send_json(request)).await?;
        Ok(updated.into_inner())
    }

    async fn delete(&self, id: ModelId) -> Result<()> {
        logged(
            RESOURCE,
            "delete",
            self.client.send_unit(ApiRequest::delete(format!("/products/{id}"))),
        )
        .await
    }

    async fn delete_many(&self, ids: &[ModelId]) -> Result<()> {
        let request = ApiRequest::delete("/products").json(&IdList { ids })?;
        logged(RESOURCE, "delete_many", self.client.send_unit(request)).await
    }

    fn apply_patch(&self, product: &mut Product, form: &ProductForm) {
        form.apply_to(product);
    }
}
