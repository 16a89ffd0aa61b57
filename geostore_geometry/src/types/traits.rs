use crate::{BoundingBox, GeometryError};
use serde_json::Value;
use std::fmt::Debug;

/// Shared behaviour of all polygonal building blocks.
pub trait GeometryTrait: Debug + Clone + Sized {
	/// Returns the area of the geometry using the shoelace formula.
	/// Rings report a signed area; polygons subtract their holes.
	fn area(&self) -> f64;

	/// Verifies the geometric invariants, e.g. that rings have at least four
	/// points and are closed.
	fn verify(&self) -> Result<(), GeometryError>;

	/// Converts the geometry into the GeoJSON `coordinates` array.
	fn to_coord_json(&self) -> Value;

	/// Checks if a point is inside this geometry.
	///
	/// Points exactly on the boundary may return either value; callers that
	/// need boundary contact test the edges separately.
	fn contains_point(&self, x: f64, y: f64) -> bool;

	/// Computes the bounding box of all coordinates, or `None` if the geometry is empty.
	fn compute_bounds(&self) -> Option<BoundingBox>;
}

/// Read access to the elements of a composite geometry,
/// e.g. the rings of a polygon or the polygons of a multipolygon.
pub trait CompositeGeometryTrait<Item>: Debug + Clone {
	/// Returns the inner elements.
	fn as_slice(&self) -> &[Item];

	/// Consumes the composite geometry and returns the inner elements.
	fn into_inner(self) -> Vec<Item>;

	fn is_empty(&self) -> bool {
		self.as_slice().is_empty()
	}

	fn len(&self) -> usize {
		self.as_slice().len()
	}

	fn first(&self) -> Option<&Item> {
		self.as_slice().first()
	}

	fn last(&self) -> Option<&Item> {
		self.as_slice().last()
	}

	fn iter(&self) -> std::slice::Iter<'_, Item> {
		self.as_slice().iter()
	}
}
