use super::*;
use crate::{BoundingBox, GeometryError};
use serde_json::Value;
use std::fmt::Debug;

/// A polygon: one exterior ring followed by optional interior rings (holes).
#[derive(Clone, PartialEq)]
pub struct PolygonGeometry(Vec<RingGeometry>);

impl PolygonGeometry {
	/// Parses the GeoJSON coordinates of a polygon (an array of rings) and verifies them.
	pub fn from_json(value: &Value) -> Result<Self, GeometryError> {
		let rings = value
			.as_array()
			.ok_or_else(|| GeometryError::Malformed("a polygon must be an array of rings".to_string()))?;
		let polygon = PolygonGeometry(rings.iter().map(RingGeometry::from_json).collect::<Result<_, _>>()?);
		polygon.verify()?;
		Ok(polygon)
	}

	/// The exterior ring. Only `None` for an unverified, empty polygon.
	#[must_use]
	pub fn exterior(&self) -> Option<&RingGeometry> {
		self.0.first()
	}

	/// The interior rings (holes).
	#[must_use]
	pub fn interiors(&self) -> &[RingGeometry] {
		self.0.get(1..).unwrap_or_default()
	}

	/// Wraps this polygon into a one-part multipolygon.
	#[must_use]
	pub fn into_multi(self) -> MultiPolygonGeometry {
		MultiPolygonGeometry::from(vec![self])
	}
}

impl GeometryTrait for PolygonGeometry {
	fn area(&self) -> f64 {
		let mut rings = self.0.iter();
		let Some(exterior) = rings.next() else {
			return 0.0;
		};
		let holes: f64 = rings.map(|ring| ring.area().abs()).sum();
		exterior.area().abs() - holes
	}

	fn verify(&self) -> Result<(), GeometryError> {
		if self.0.is_empty() {
			return Err(GeometryError::EmptyPolygon);
		}
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	fn to_coord_json(&self) -> Value {
		Value::from(self.0.iter().map(RingGeometry::to_coord_json).collect::<Vec<_>>())
	}

	/// A point is inside the polygon if it is inside the exterior ring
	/// and not inside any of the holes.
	fn contains_point(&self, x: f64, y: f64) -> bool {
		match self.exterior() {
			Some(exterior) => {
				exterior.contains_point(x, y) && !self.interiors().iter().any(|hole| hole.contains_point(x, y))
			}
			None => false,
		}
	}

	/// Holes lie inside the exterior ring, so the exterior alone defines the bounds.
	fn compute_bounds(&self) -> Option<BoundingBox> {
		self.exterior().and_then(RingGeometry::compute_bounds)
	}
}

impl CompositeGeometryTrait<RingGeometry> for PolygonGeometry {
	fn as_slice(&self) -> &[RingGeometry] {
		&self.0
	}
	fn into_inner(self) -> Vec<RingGeometry> {
		self.0
	}
}

impl Debug for PolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(PolygonGeometry, RingGeometry);

impl From<geo::Polygon<f64>> for PolygonGeometry {
	fn from(geometry: geo::Polygon<f64>) -> Self {
		let (exterior, interiors) = geometry.into_inner();
		let mut rings = Vec::with_capacity(interiors.len() + 1);
		rings.push(RingGeometry::from(exterior));
		for interior in interiors {
			rings.push(RingGeometry::from(interior));
		}
		PolygonGeometry(rings)
	}
}

impl From<PolygonGeometry> for geo::Polygon<f64> {
	fn from(polygon: PolygonGeometry) -> Self {
		let mut rings = polygon.0.into_iter().map(geo::LineString::from);
		let exterior = rings.next().unwrap_or_else(|| geo::LineString::new(Vec::new()));
		geo::Polygon::new(exterior, rings.collect())
	}
}
