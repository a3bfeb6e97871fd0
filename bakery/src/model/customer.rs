use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, ModelId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Customer {
    pub id: ModelId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
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
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Customer {
    fn id(&self) -> ModelId {
        self.id
    }
}
