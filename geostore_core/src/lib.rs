//! Core of the GeoStore feature store.
//!
//! - [`feature`]: the feature model (`Feature`, `FeatureKind`, `NewFeature`, `FeaturePatch`)
//! - [`repository`]: the per-kind [`FeatureRepository`] with an in-memory and a SQLite backend
//! - [`ingest`]: bulk ingest with per-item validation and de-duplication
//! - [`query`]: bounding-box parsing and spatial filtering
//! - [`store`]: one repository per feature kind

pub mod error;
pub mod feature;
pub mod ingest;
pub mod query;
pub mod repository;
pub mod store;

pub use error::{ErrorKind, FeatureError};
pub use feature::*;
pub use ingest::*;
pub use query::*;
pub use repository::*;
pub use store::*;

pub use geostore_geometry::{BoundingBox, Geometry};
