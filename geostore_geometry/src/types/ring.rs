use super::{CompositeGeometryTrait, Coordinates, GeometryTrait};
use crate::{BoundingBox, GeometryError};
use serde_json::Value;
use std::fmt::Debug;

/// A closed ring: a connected series of coordinates forming a loop.
/// Rings are the building blocks of polygons; the first and last points
/// must be identical.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(Vec<Coordinates>);

impl RingGeometry {
	/// Parses a GeoJSON linear ring and verifies it.
	pub fn from_json(value: &Value) -> Result<Self, GeometryError> {
		let positions = value
			.as_array()
			.ok_or_else(|| GeometryError::Malformed("a ring must be an array of positions".to_string()))?;
		let ring = RingGeometry(positions.iter().map(Coordinates::from_json).collect::<Result<_, _>>()?);
		ring.verify()?;
		Ok(ring)
	}

	/// Iterates over the edges `(start, end)` of the ring.
	pub fn edges(&self) -> impl Iterator<Item = (Coordinates, Coordinates)> + '_ {
		self.0.windows(2).map(|pair| (pair[0], pair[1]))
	}
}

impl GeometryTrait for RingGeometry {
	/// Computes the signed area of the ring using the shoelace formula.
	/// The area is positive if the ring is oriented counterclockwise,
	/// and negative if clockwise.
	fn area(&self) -> f64 {
		let mut sum = 0f64;
		if let Some(mut p2) = self.0.last() {
			for p1 in &self.0 {
				sum += (p2.x() - p1.x()) * (p1.y() + p2.y());
				p2 = p1;
			}
		}
		sum / 2.0
	}

	/// Verifies that the ring is valid by checking:
	/// - all coordinates are finite,
	/// - it has at least 4 coordinates (3 unique points plus the closing point),
	/// - it is closed, i.e. the first and last points are identical.
	fn verify(&self) -> Result<(), GeometryError> {
		if !self.0.iter().all(Coordinates::is_finite) {
			return Err(GeometryError::InvalidPosition);
		}
		if self.0.len() < 4 {
			return Err(GeometryError::TooFewPoints(self.0.len()));
		}
		if self.0.first() != self.0.last() {
			return Err(GeometryError::RingNotClosed);
		}
		Ok(())
	}

	fn to_coord_json(&self) -> Value {
		Value::from(self.0.iter().map(Coordinates::to_json).collect::<Vec<_>>())
	}

	fn contains_point(&self, x: f64, y: f64) -> bool {
		let coords = &self.0;
		if coords.len() < 4 {
			return false;
		}

		let mut inside = false;
		let mut j = coords.len() - 1;

		for i in 0..coords.len() {
			let xi = coords[i].x();
			let yi = coords[i].y();
			let xj = coords[j].x();
			let yj = coords[j].y();

			// Check if point is on the same side and crosses the ray
			if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
				inside = !inside;
			}
			j = i;
		}

		inside
	}

	fn compute_bounds(&self) -> Option<BoundingBox> {
		BoundingBox::from_coordinates(self.0.iter())
	}
}

impl CompositeGeometryTrait<Coordinates> for RingGeometry {
	fn as_slice(&self) -> &[Coordinates] {
		&self.0
	}
	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(RingGeometry, Coordinates);

/// Converts a `geo::LineString<f64>` into a `RingGeometry`, preserving the order of coordinates.
impl From<geo::LineString<f64>> for RingGeometry {
	fn from(geometry: geo::LineString<f64>) -> Self {
		RingGeometry(geometry.into_iter().map(Coordinates::from).collect())
	}
}

impl From<RingGeometry> for geo::LineString<f64> {
	fn from(ring: RingGeometry) -> Self {
		geo::LineString::new(ring.0.into_iter().map(geo::Coord::from).collect())
	}
}
