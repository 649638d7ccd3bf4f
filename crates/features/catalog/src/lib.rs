//! # Catalog
//!
//! Leaf clients of the discovery flow. Each concern is a trait so controllers
//! can run against [`HttpCatalog`] in production and in-memory fakes in tests.
//!
//! | Trait | Endpoints |
//! |---|---|
//! | [`RegionCatalog`] | `GET regions`, `GET regions/{code}/localities` |
//! | [`ItemCatalog`] | `GET items` |
//! | [`PointDirectory`] | `GET points?city=..&uf=..&items=..`, `GET points/{id}` |

mod error;
mod http;
mod source;

pub use crate::error::{FetchError, FetchErrorExt};
pub use crate::http::HttpCatalog;
pub use crate::source::{CatalogSource, ItemCatalog, PointDirectory, PointQuery, RegionCatalog};
