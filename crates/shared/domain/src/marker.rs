use crate::geo::Coordinate;
use crate::ids::PointId;
use crate::point::Point;
use serde::Serialize;

/// Renderable map marker; taps report back the point id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub point: PointId,
    pub coordinate: Coordinate,
    /// Thumbnail URI.
    pub image: String,
    pub label: String,
}

impl From<&Point> for Marker {
    fn from(point: &Point) -> Self {
        Self {
            point: point.id,
            coordinate: point.coordinate,
            image: point.image.clone(),
            label: point.name.clone(),
        }
    }
}
