use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::ItemShortDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDto {
    pub id: i64,
    pub description: String,
    pub created: DateTime<Utc>,
    /// Items listed in answer to this request; empty when none, never null.
    pub items: Vec<ItemShortDto>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItemRequestDto {
    pub description: Option<String>,
}
