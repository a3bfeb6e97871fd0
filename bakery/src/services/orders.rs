use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use transport::{ApiClient, ApiRequest, QueryParams};

use super::{IdList, ResourceService, logged};
use crate::errors::Result;
use crate::forms::{NewOrder, OrderUpdate};
use crate::model::{ModelId, Order, OrderHistoryEntry, Paginated, Single};
use crate::stores::ListFilter;

const RESOURCE: &str = "orders";

#[derive(Serialize)]
struct NoteBody<'a> {
    note: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryShape {
    Wrapped { data: Vec<OrderHistoryEntry> },
    Bare(Vec<OrderHistoryEntry>),
}

pub struct OrderService {
    client: Arc<ApiClient>,
}

impl OrderService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get(&self, id: ModelId) -> Result<Order> {
        let order: Single<Order> = logged(
            RESOURCE,
            "get",
            self.client.get_json(&format!("/orders/{id}"), QueryParams::new()),
        )
        .await?;
        Ok(order.into_inner())
    }

    pub async fn history(&self, id: ModelId) -> Result<Vec<OrderHistoryEntry>> {
        let history: HistoryShape = logged(
            RESOURCE,
            "history",
            self.client.get_json(&format!("/orders/{id}/history"), QueryParams::new()),
        )
        .await?;
        Ok(match history {
            HistoryShape::Wrapped { data } | HistoryShape::Bare(data) => data,
        })
    }

    pub async fn add_note(&self, id: ModelId, note: &str) -> Result<()> {
        let request = ApiRequest::post(format!("/orders/{id}/notes")).json(&NoteBody { note })?;
        logged(RESOURCE, "add_note", self.client.send_unit(request)).await
    }

    /// Invoice document bytes (PDF).
    pub async fn invoice(&self, id: ModelId) -> Result<Vec<u8>> {
        logged(
            RESOURCE,
            "invoice",
            self.client.get_blob(&format!("/orders/{id}/invoice"), QueryParams::new()),
        )
        .await
    }

    /// Export of every order matching `filter` (paging is ignored).
    pub async fn export(&self, filter: &ListFilter) -> Result<Vec<u8>> {
        let mut query = filter.to_query()?;
        query.remove("page");
        query.remove("limit");
        logged(RESOURCE, "export", self.client.get_blob("/orders/export", query)).await
    }

    pub async fn send_confirmation(&self, id: ModelId) -> Result<()> {
        logged(
            RESOURCE,
            "send_confirmation",
            self.client
                .send_unit(ApiRequest::post(format!("/orders/{id}/send-confirmation"))),
        )
        .await
    }
}

#[async_trait]
impl ResourceService for OrderService {
    type Item = Order;
    type Draft = NewOrder;
    type Patch = OrderUpdate;

    fn resource(&self) -> &'static str {
        RESOURCE
    }

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Order>> {
        let query = filter.to_query()?;
        logged(RESOURCE, "list", self.client.get_json("/orders", query)).await
    }

    async fn create(&self, order: &NewOrder) -> Result<Order> {
        let created: Single<Order> =
            logged(RESOURCE, "create", self.client.post_json("/orders", order)).await?;
        Ok(created.into_inner())
    }

    async fn update(&self, id: ModelId, update: &OrderUpdate) -> Result<Order> {
        let updated: Single<Order> = logged(
            RESOURCE,
            "update",
            self.client.patch_json(&format!("/orders/{id}"), update),
        )
        .await?;
        Ok(updated.into_inner())
    }

    async fn delete(&self, id: ModelId) -> Result<()> {
        self.delete_many(&[id]).await
    }

    async fn delete_many(&self, ids: &[ModelId]) -> Result<()> {
        let request = ApiRequest::delete("/orders").json(&IdList { ids })?;
        logged(RESOURCE, "delete_many", self.client.send_unit(request)).await
    }

    fn apply_patch(&self, order: &mut Order, update: &OrderUpdate) {
        update.apply_to(order);
    }
}
