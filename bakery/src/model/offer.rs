//! Offers are the one resource whose wire names (snake_case) and view names
//! (camelCase) diverge. Servers have sent both spellings over time, so reads
//! go through [`OfferRecord`], which accepts either, and writes go out as
//! [`OfferPayload`]. The conversions below are the only place the two meet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Identified, ModelId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => f.write_str("percentage"),
            DiscountType::Fixed => f.write_str("fixed"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("offer record is missing `{0}`")]
pub struct MissingOfferField(pub &'static str);

/// Offer as the server sends it, in whichever spelling.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OfferRecord {
    pub id: Option<ModelId>,
    pub name: Option<String>,
    #[serde(rename = "productId")]
    pub product_id_camel: Option<ModelId>,
    pub product_id: Option<ModelId>,
    #[serde(rename = "discountType")]
    pub discount_type_camel: Option<DiscountType>,
    pub discount_type: Option<DiscountType>,
    #[serde(rename = "discountValue", deserialize_with = "super::lenient_opt_f64")]
    pub discount_value_camel: Option<f64>,
    #[serde(deserialize_with = "super::lenient_opt_f64")]
    pub discount_value: Option<f64>,
    #[serde(rename = "startTime")]
    pub start_time_camel: Option<DateTime<Utc>>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "endTime")]
    pub end_time_camel: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "isActive")]
    pub is_active_camel: Option<bool>,
    pub is_active: Option<bool>,
    #[serde(rename = "createdAt")]
    pub created_at_camel: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt")]
    pub updated_at_camel: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// View model used by forms and tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: ModelId,
    pub name: String,
    pub product_id: ModelId,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Offer {
    fn id(&self) -> ModelId {
        self.id
    }
}

impl Offer {
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_time <= now && now <= self.end_time
    }
}

impl TryFrom<OfferRecord> for Offer {
    type Error = MissingOfferField;

    fn try_from(record: OfferRecord) -> Result<Self, Self::Error> {
        Ok(Offer {
            id: record.id.ok_or(MissingOfferField("id"))?,
            name: record.name.unwrap_or_default(),
            product_id: record
                .product_id_camel
                .or(record.product_id)
                .ok_or(MissingOfferField("productId"))?,
            discount_type: record
                .discount_type_camel
                .or(record.discount_type)
                .ok_or(MissingOfferField("discountType"))?,
            discount_value: record
                .discount_value_camel
                .or(record.discount_value)
                .ok_or(MissingOfferField("discountValue"))?,
            start_time: record
                .start_time_camel
                .or(record.start_time)
                .ok_or(MissingOfferField("startTime"))?,
            end_time: record
                .end_time_camel
                .or(record.end_time)
                .ok_or(MissingOfferField("endTime"))?,
            is_active: record.is_active_camel.or(record.is_active).unwrap_or(true),
            created_at: record.created_at_camel.or(record.created_at),
            updated_at: record.updated_at_camel.or(record.updated_at),
        })
    }
}

/// Create/update body, snake_case as the server expects.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OfferPayload {
    pub name: String,
    pub product_id: ModelId,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
}

impl From<&Offer> for OfferPayload {
    fn from(offer: &Offer) -> Self {
        OfferPayload {
            name: offer.name.clone(),
            product_id: offer.product_id,
            discount_type: offer.discount_type,
            discount_value: offer.discount_value,
            start_time: offer.start_time,
            end_time: offer.end_time,
            is_active: offer.is_active,
        }
    }
}

impl OfferPayload {
    pub fn apply_to(&self, offer: &mut Offer) {
        offer.name = self.name.clone();
        offer.product_id = self.product_id;
        offer.discount_type = self.discount_type;
        offer.discount_value = self.discount_value;
        offer.start_time = self.start_time;
        offer.end_time = self.end_time;
        offer.is_active = self.is_active;
    }
}
