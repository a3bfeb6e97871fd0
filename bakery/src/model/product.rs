use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, ModelId, default_true, lenient_f64, lenient_opt_f64};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ModelId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, alias = "compare_at_price", deserialize_with = "lenient_opt_f64")]
    pub compare_at_price: Option<f64>,
    #[serde(default, alias = "cost_per_unit", deserialize_with = "lenient_opt_f64")]
    pub cost_per_unit: Option<f64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<ModelId>,
    #[serde(default = "default_true", alias = "is_active")]
    pub is_active: bool,
    #[serde(default)]
    pub availability: Option<DateTime<Utc>>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Product {
    fn id(&self) -> ModelId {
        self.id
    }
}

impl Product {
    /// Percentage off the compare-at price, when there is a real markdown.
    pub fn discount_percent(&self) -> Option<f64> {
        match self.compare_at_price {
            Some(compare) if compare > self.price && compare > 0.0 => {
                Some(((compare - self.price) / compare * 100.0 * 100.0).round() / 100.0)
            }
            _ => None,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
