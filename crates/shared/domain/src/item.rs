use crate::ids::ItemId;
use serde::{Deserialize, Serialize};

/// A recyclable-material classification a point may accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub id: ItemId,
    pub title: String,
    /// Opaque icon URI.
    #[serde(default, alias = "imageUrl", alias = "image_url")]
    pub icon: String,
}
