use super::{CompositeGeometryTrait, GeometryTrait, PolygonGeometry};
use crate::{BoundingBox, GeometryError};
use serde_json::Value;
use std::fmt::Debug;

/// Represents a collection of polygons, each of which may have an outer ring and optional inner holes.
/// This struct is used for complex, multi-part areas such as municipalities with islands.
#[derive(Clone, PartialEq)]
pub struct MultiPolygonGeometry(Vec<PolygonGeometry>);

impl MultiPolygonGeometry {
	/// Parses the GeoJSON coordinates of a multipolygon (an array of polygons) and verifies them.
	pub fn from_json(value: &Value) -> Result<Self, GeometryError> {
		let polygons = value
			.as_array()
			.ok_or_else(|| GeometryError::Malformed("a multipolygon must be an array of polygons".to_string()))?;
		let multi = MultiPolygonGeometry(
			polygons
				.iter()
				.map(PolygonGeometry::from_json)
				.collect::<Result<_, _>>()?,
		);
		multi.verify()?;
		Ok(multi)
	}
}

/// - `area()` returns the sum of all polygon areas.
/// - `verify()` checks that there is at least one polygon and that each polygon is valid.
/// - `contains_point()` is true if any part contains the point.
impl GeometryTrait for MultiPolygonGeometry {
	fn area(&self) -> f64 {
		self.0.iter().map(GeometryTrait::area).sum()
	}

	fn verify(&self) -> Result<(), GeometryError> {
		if self.0.is_empty() {
			return Err(GeometryError::EmptyMultiPolygon);
		}
		for polygon in &self.0 {
			polygon.verify()?;
		}
		Ok(())
	}

	fn to_coord_json(&self) -> Value {
		Value::from(
			self
				.0
				.iter()
				.map(PolygonGeometry::to_coord_json)
				.collect::<Vec<_>>(),
		)
	}

	fn contains_point(&self, x: f64, y: f64) -> bool {
		self.0.iter().any(|poly| poly.contains_point(x, y))
	}

	fn compute_bounds(&self) -> Option<BoundingBox> {
		self
			.0
			.iter()
			.filter_map(PolygonGeometry::compute_bounds)
			.reduce(|a, b| a.extended(&b))
	}
}

impl CompositeGeometryTrait<PolygonGeometry> for MultiPolygonGeometry {
	fn as_slice(&self) -> &[PolygonGeometry] {
		&self.0
	}
	fn into_inner(self) -> Vec<PolygonGeometry> {
		self.0
	}
}

impl Debug for MultiPolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiPolygonGeometry, PolygonGeometry);

impl From<geo::MultiPolygon<f64>> for MultiPolygonGeometry {
	fn from(geometry: geo::MultiPolygon<f64>) -> Self {
		MultiPolygonGeometry(geometry.into_iter().map(PolygonGeometry::from).collect())
	}
}

impl From<MultiPolygonGeometry> for geo::MultiPolygon<f64> {
	fn from(multi: MultiPolygonGeometry) -> Self {
		geo::MultiPolygon::new(multi.0.into_iter().map(geo::Polygon::from).collect())
	}
}
