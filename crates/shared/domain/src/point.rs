use crate::geo::Coordinate;
use crate::ids::{ItemId, PointId};
use crate::region::RegionCode;
use serde::{Deserialize, Deserializer, Serialize};

/// A category reference carried by a point.
///
/// Payloads list either bare ids (`3`) or objects (`{"id": 3, "title": "Pilhas"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ItemRefRepr")]
pub struct ItemRef {
    pub id: ItemId,
    pub title: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRefRepr {
    Bare(ItemId),
    Full {
        id: ItemId,
        #[serde(default)]
        title: String,
    },
}

impl From<ItemRefRepr> for ItemRef {
    fn from(repr: ItemRefRepr) -> Self {
        match repr {
            ItemRefRepr::Bare(id) => Self { id, title: String::new() },
            ItemRefRepr::Full { id, title } => Self { id, title },
        }
    }
}

/// A physical waste-collection location. Read-only once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    /// Chat handle, usually a phone number.
    #[serde(default, alias = "whatsapp")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub city: String,
    #[serde(alias = "uf")]
    pub region: RegionCode,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

impl Point {
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    /// Item titles joined for display, `"Lâmpadas, Pilhas e Baterias"`.
    #[must_use]
    pub fn items_label(&self) -> String {
        self.items
            .iter()
            .map(|item| item.title.as_str())
            .filter(|title| !title.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `"Fortaleza, CE"`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}, {}", self.city, self.region)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
