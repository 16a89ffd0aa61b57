use crate::{
	BoundingBox, CompositeGeometryTrait, GeometryError, GeometryTrait, MultiPolygonGeometry, PolygonGeometry,
	math::polygons_intersect,
};
use serde_json::{Value, json};
use std::{fmt::Debug, slice};

/// The polygonal geometry of a feature.
///
/// A `Geometry` is always valid: it can only be built through [`Geometry::parse`]
/// or the checked constructors, which verify every ring, polygon and multipolygon.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Polygon(PolygonGeometry),
	MultiPolygon(MultiPolygonGeometry),
}

impl Geometry {
	/// Parses a GeoJSON geometry object of type `Polygon` or `MultiPolygon`.
	///
	/// # Errors
	/// Returns a [`GeometryError`] if the value is not such an object or if the
	/// coordinates violate any ring, polygon or multipolygon invariant.
	pub fn parse(raw: &Value) -> Result<Geometry, GeometryError> {
		let object = raw.as_object().ok_or(GeometryError::NotAnObject)?;
		let type_name = object
			.get("type")
			.and_then(Value::as_str)
			.ok_or(GeometryError::MissingType)?;
		let coordinates = object
			.get("coordinates")
			.filter(|value| !value.is_null())
			.ok_or(GeometryError::MissingCoordinates)?;

		match type_name {
			"Polygon" => Ok(Geometry::Polygon(PolygonGeometry::from_json(coordinates)?)),
			"MultiPolygon" => Ok(Geometry::MultiPolygon(MultiPolygonGeometry::from_json(coordinates)?)),
			other => Err(GeometryError::UnknownType(other.to_string())),
		}
	}

	/// Wraps an already built polygon after verifying it.
	pub fn new_polygon(polygon: PolygonGeometry) -> Result<Geometry, GeometryError> {
		polygon.verify()?;
		Ok(Geometry::Polygon(polygon))
	}

	/// Wraps an already built multipolygon after verifying it.
	pub fn new_multi_polygon(multi: MultiPolygonGeometry) -> Result<Geometry, GeometryError> {
		multi.verify()?;
		Ok(Geometry::MultiPolygon(multi))
	}

	/// The parts of this geometry. A polygon is a single part.
	#[must_use]
	pub fn polygons(&self) -> &[PolygonGeometry] {
		match self {
			Geometry::Polygon(polygon) => slice::from_ref(polygon),
			Geometry::MultiPolygon(multi) => multi.as_slice(),
		}
	}

	/// True if the two geometries share at least one point.
	///
	/// Touching boundaries count as intersecting. A multipolygon is the union of its parts.
	#[must_use]
	pub fn intersects(&self, other: &Geometry) -> bool {
		if !self.bounding_box().intersects_bbox(&other.bounding_box()) {
			return false;
		}
		self
			.polygons()
			.iter()
			.any(|a| other.polygons().iter().any(|b| polygons_intersect(a, b)))
	}

	/// True if the geometry intersects the rectangle described by `bbox`.
	#[must_use]
	pub fn intersects_bbox(&self, bbox: &BoundingBox) -> bool {
		let rectangle = bbox.to_polygon();
		self.bounding_box().intersects_bbox(bbox) && self.polygons().iter().any(|p| polygons_intersect(p, &rectangle))
	}

	/// The smallest axis-aligned box containing every coordinate of the geometry.
	#[must_use]
	pub fn bounding_box(&self) -> BoundingBox {
		let bounds = match self {
			Geometry::Polygon(polygon) => polygon.compute_bounds(),
			Geometry::MultiPolygon(multi) => multi.compute_bounds(),
		};
		// verified geometries always have at least one coordinate
		bounds.unwrap_or(BoundingBox {
			x_min: 0.0,
			y_min: 0.0,
			x_max: 0.0,
			y_max: 0.0,
		})
	}

	#[must_use]
	pub fn contains_point(&self, x: f64, y: f64) -> bool {
		self.polygons().iter().any(|p| p.contains_point(x, y))
	}

	/// Planar area in square degrees, holes subtracted.
	#[must_use]
	pub fn area(&self) -> f64 {
		self.polygons().iter().map(GeometryTrait::area).sum()
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPolygon(_) => "MultiPolygon",
		}
	}

	/// The GeoJSON geometry object. `Geometry::parse(&g.to_json())` yields `g` again.
	#[must_use]
	pub fn to_json(&self) -> Value {
		let coordinates = match self {
			Geometry::Polygon(polygon) => polygon.to_coord_json(),
			Geometry::MultiPolygon(multi) => multi.to_coord_json(),
		};
		json!({
			"type": self.type_name(),
			"coordinates": coordinates,
		})
	}

	/// Promotes a polygon to a one-part multipolygon; multipolygons are returned unchanged.
	#[must_use]
	pub fn into_multi(self) -> Geometry {
		match self {
			Geometry::Polygon(polygon) => Geometry::MultiPolygon(polygon.into_multi()),
			multi @ Geometry::MultiPolygon(_) => multi,
		}
	}

	#[must_use]
	pub fn is_multi(&self) -> bool {
		matches!(self, Geometry::MultiPolygon(_))
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let (name, inner): (&str, &dyn Debug) = match self {
			Geometry::Polygon(g) => ("Polygon", g),
			Geometry::MultiPolygon(g) => ("MultiPolygon", g),
		};
		f.debug_tuple(name).field(inner).finish()
	}
}

impl TryFrom<&Value> for Geometry {
	type Error = GeometryError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		Geometry::parse(value)
	}
}

impl TryFrom<geo::Polygon<f64>> for Geometry {
	type Error = GeometryError;

	fn try_from(polygon: geo::Polygon<f64>) -> Result<Self, Self::Error> {
		Geometry::new_polygon(PolygonGeometry::from(polygon))
	}
}

impl TryFrom<geo::MultiPolygon<f64>> for Geometry {
	type Error = GeometryError;

	fn try_from(multi: geo::MultiPolygon<f64>) -> Result<Self, Self::Error> {
		Geometry::new_multi_polygon(MultiPolygonGeometry::from(multi))
	}
}

impl From<Geometry> for geo::Geometry<f64> {
	fn from(geometry: Geometry) -> Self {
		match geometry {
			Geometry::Polygon(polygon) => geo::Geometry::Polygon(polygon.into()),
			Geometry::MultiPolygon(multi) => geo::Geometry::MultiPolygon(multi.into()),
		}
	}
}
