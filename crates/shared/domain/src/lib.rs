//! # Domain Models
//!
//! Pure data for the discovery flow: regions, localities, material categories,
//! collection points, map markers, and the client configuration.
//! Keep it lean: `serde` only, no I/O, networking, or orchestration logic.

pub mod config;
pub mod geo;
pub mod ids;
pub mod item;
pub mod marker;
pub mod point;
pub mod region;

pub use geo::Coordinate;
pub use ids::{ItemId, PointId};
pub use item::ItemCategory;
pub use marker::Marker;
pub use point::{ItemRef, Point};
pub use region::{Locality, Region, RegionCode, is_no_choice};
