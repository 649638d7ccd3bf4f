use crate::error::FetchError;
use eco_domain::{ItemCategory, ItemId, Locality, Point, PointId, Region, RegionCode};
use std::future::Future;

/// Region and locality lookups.
pub trait RegionCatalog: Send + Sync {
    fn fetch_regions(&self) -> impl Future<Output = Result<Vec<Region>, FetchError>> + Send;

    fn fetch_localities(
        &self,
        region: &RegionCode,
    ) -> impl Future<Output = Result<Vec<Locality>, FetchError>> + Send;
}

/// The fixed list of material categories.
pub trait ItemCatalog: Send + Sync {
    fn fetch_items(&self) -> impl Future<Output = Result<Vec<ItemCategory>, FetchError>> + Send;
}

/// Collection point lookups.
pub trait PointDirectory: Send + Sync {
    /// Points of one locality, optionally narrowed server-side by item ids.
    fn fetch_points(
        &self,
        query: &PointQuery,
    ) -> impl Future<Output = Result<Vec<Point>, FetchError>> + Send;

    fn fetch_point(&self, id: PointId) -> impl Future<Output = Result<Point, FetchError>> + Send;
}

/// Everything the discovery flow reads from.
pub trait CatalogSource: RegionCatalog + ItemCatalog + PointDirectory {}

impl<T> CatalogSource for T where T: RegionCatalog + ItemCatalog + PointDirectory {}

/// Parameters of a point list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointQuery {
    pub region: RegionCode,
    pub locality: String,
    /// Sent comma-separated; omitted from the request when empty.
    pub items: Vec<ItemId>,
}

impl PointQuery {
    pub fn new(region: RegionCode, locality: impl Into<String>) -> Self {
        Self { region, locality: locality.into(), items: Vec::new() }
    }

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// `"1,2,3"`, or `None` without item constraints.
    pub fn items_param(&self) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.iter().map(ToString::to_string).collect::<Vec<_>>().join(","))
    }
}
