//! Polygonal geometry for the GeoStore feature store.
//!
//! Provides the immutable [`Geometry`] value type (`Polygon` / `MultiPolygon`),
//! the [`BoundingBox`] query rectangle and the intersection math used by the
//! spatial queries. Geometries are read from and written to GeoJSON geometry
//! objects; coordinates are WGS84 `(longitude, latitude)` pairs and are never
//! reprojected.

mod bbox;
mod error;
mod geometry;
pub mod math;
mod types;

pub use bbox::*;
pub use error::*;
pub use geometry::*;
pub use types::*;
