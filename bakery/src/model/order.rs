use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Identified, ModelId, lenient_f64};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "New", alias = "NEW")]
    New,
    #[serde(alias = "Processing", alias = "PROCESSING")]
    Processing,
    #[serde(alias = "Shipped", alias = "SHIPPED")]
    Shipped,
    #[serde(alias = "Delivered", alias = "DELIVERED")]
    Delivered,
    #[serde(alias = "Cancelled", alias = "CANCELLED", alias = "canceled")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::New => "New",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<ModelId>,
    pub product_id: ModelId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(deserialize_with = "lenient_f64")]
    pub unit_price: f64,
}

impl OrderItem {
    pub fn total(&self) -> f64 {
        line_total(self.quantity, self.unit_price)
    }
}

/// `quantity * unit_price`, rounded to cents.
pub fn line_total(quantity: u32, unit_price: f64) -> f64 {
    (quantity as f64 * unit_price * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: ModelId,
    pub order_number: String,
    pub customer_id: ModelId,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_opt_f64")]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}

impl Identified for Order {
    fn id(&self) -> ModelId {
        self.id
    }
}

impl Order {
    pub fn subtotal(&self) -> f64 {
        let cents: f64 = self.items.iter().map(|item| item.total() * 100.0).sum();
        cents.round() / 100.0
    }

    pub fn grand_total(&self) -> f64 {
        ((self.subtotal() + self.shipping_cost.unwrap_or(0.0)) * 100.0).round() / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderHistoryEntry {
    #[serde(default)]
    pub id: Option<ModelId>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
