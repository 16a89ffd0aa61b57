use crate::GeometryError;
use serde_json::Value;
use std::fmt::Debug;

/// A single `(x, y)` position, i.e. `(longitude, latitude)` in WGS84.
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates([f64; 2]);

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self([x, y])
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0[0]
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.0[1]
	}

	#[must_use]
	pub fn is_finite(&self) -> bool {
		self.0[0].is_finite() && self.0[1].is_finite()
	}

	/// Parses a GeoJSON position. Exactly two numbers are accepted;
	/// a third (altitude) value is rejected.
	pub fn from_json(value: &Value) -> Result<Self, GeometryError> {
		let array = value.as_array().ok_or(GeometryError::InvalidPosition)?;
		if array.len() != 2 {
			return Err(GeometryError::InvalidPosition);
		}
		let x = array[0].as_f64().ok_or(GeometryError::InvalidPosition)?;
		let y = array[1].as_f64().ok_or(GeometryError::InvalidPosition)?;
		let coord = Coordinates::new(x, y);
		if !coord.is_finite() {
			return Err(GeometryError::InvalidPosition);
		}
		Ok(coord)
	}

	#[must_use]
	pub fn to_json(&self) -> Value {
		Value::from(self.0.to_vec())
	}
}

impl<'a, T> From<&'a [T; 2]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: &'a [T; 2]) -> Self {
		Coordinates([value[0].into(), value[1].into()])
	}
}

impl From<[f64; 2]> for Coordinates {
	fn from(value: [f64; 2]) -> Self {
		Coordinates(value)
	}
}

impl From<(f64, f64)> for Coordinates {
	fn from(value: (f64, f64)) -> Self {
		Coordinates([value.0, value.1])
	}
}

impl From<Coordinates> for [f64; 2] {
	fn from(value: Coordinates) -> Self {
		value.0
	}
}

impl From<geo::Coord> for Coordinates {
	fn from(value: geo::Coord) -> Self {
		Coordinates([value.x, value.y])
	}
}

impl From<Coordinates> for geo::Coord {
	fn from(value: Coordinates) -> Self {
		geo::Coord {
			x: value.x(),
			y: value.y(),
		}
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}
