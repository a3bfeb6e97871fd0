use async_trait::async_trait;
use std::sync::Arc;

use transport::{ApiClient, ApiError, ApiRequest, QueryParams};

use super::{ResourceService, log_failure, logged};
use crate::errors::{Error, Result};
use crate::model::{ModelId, Offer, OfferPayload, OfferRecord, Paginated, Single};
use crate::stores::ListFilter;

const RESOURCE: &str = "offers";

pub struct OfferService {
    client: Arc<ApiClient>,
}

impl OfferService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn to_offer(action: &str, record: OfferRecord) -> Result<Offer> {
        Offer::try_from(record)
            .map_err(|e| Error::Api(ApiError::Decode(e.to_string())))
            .inspect_err(|e| log_failure(RESOURCE, action, e))
    }

    fn to_offers(action: &str, records: Vec<OfferRecord>) -> Result<Vec<Offer>> {
        records
            .into_iter()
            .map(|record| Self::to_offer(action, record))
            .collect()
    }

    /// Offers running right now.
    pub async fn active(&self) -> Result<Vec<Offer>> {
        let page: Paginated<OfferRecord> = logged(
            RESOURCE,
            "active",
            self.client.get_json("/offers/active", QueryParams::new()),
        )
        .await?;
        Self::to_offers("active", page.data)
    }
}

#[async_trait]
impl ResourceService for OfferService {
    type Item = Offer;
    type Draft = OfferPayload;
    type Patch = OfferPayload;

    fn resource(&self) -> &'static str {
        RESOURCE
    }

    async fn list(&self, filter: &ListFilter) -> Result<Paginated<Offer>> {
        let query = filter.to_query()?;
        let page: Paginated<OfferRecord> =
            logged(RESOURCE, "list", self.client.get_json("/offers", query)).await?;
        Ok(Paginated {
            data: Self::to_offers("list", page.data)?,
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        })
    }

    async fn create(&self, payload: &OfferPayload) -> Result<Offer> {
        let created: Single<OfferRecord> =
            logged(RESOURCE, "create", self.client.post_json("/offers", payload)).await?;
        Self::to_offer("create", created.into_inner())
    }

    async fn update(&self, id: ModelId, payload: &OfferPayload) -> Result<Offer> {
        let updated: Single<OfferRecord> = logged(
            RESOURCE,
            "update",
            self.client.put_json(&format!("/offers/{id}"), payload),
        )
        .await?;
        Self::to_offer("update", updated.into_inner())
    }

    async fn delete(&self, id: ModelId) -> Result<()> {
        logged(
            RESOURCE,
            "delete",
            self.client.send_unit(ApiRequest::delete(format!("/offers/{id}"))),
        )
        .await
    }

    fn apply_patch(&self, offer: &mut Offer, payload: &OfferPayload) {
        payload.apply_to(offer);
    }
}
