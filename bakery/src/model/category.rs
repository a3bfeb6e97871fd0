use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Identified, ModelId, default_true};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: ModelId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default = "default_true", alias = "is_active", alias = "isVisible")]
    pub is_active: bool,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identified for Category {
    fn id(&self) -> ModelId {
        self.id
    }
}
