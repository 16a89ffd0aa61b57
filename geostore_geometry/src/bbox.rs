use crate::{BoundingBoxError, Coordinates, PolygonGeometry, RingGeometry};
use std::{fmt, str::FromStr};

/// An axis-aligned bounding box defined by its minimum and maximum x (longitude)
/// and y (latitude) coordinates.
///
/// Invariant: all values are finite, `x_min <= x_max` and `y_min <= y_max`.
/// Bounding boxes are query parameters and are never persisted.
///
/// # Examples
///
/// ```
/// use geostore_geometry::BoundingBox;
///
/// let bbox: BoundingBox = "0,0,50,50".parse().unwrap();
/// assert_eq!(bbox.as_array(), [0.0, 0.0, 50.0, 50.0]);
///
/// let mut bbox1 = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
/// let bbox2 = BoundingBox::new(-12.0, -3.0, 8.0, 6.0).unwrap();
/// bbox1.extend(&bbox2);
/// assert_eq!(bbox1.as_array(), [-12.0, -5.0, 10.0, 6.0]);
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct BoundingBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl BoundingBox {
	/// Creates a new `BoundingBox` from `x_min, y_min, x_max, y_max`.
	///
	/// # Errors
	/// Fails if a value is not finite or if a minimum exceeds its maximum.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<BoundingBox, BoundingBoxError> {
		BoundingBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	/// The smallest box containing all given coordinates, or `None` if there are none.
	pub fn from_coordinates<'a>(coords: impl IntoIterator<Item = &'a Coordinates>) -> Option<BoundingBox> {
		let mut iter = coords.into_iter();
		let first = iter.next()?;
		let mut bbox = BoundingBox {
			x_min: first.x(),
			y_min: first.y(),
			x_max: first.x(),
			y_max: first.y(),
		};
		for coord in iter {
			bbox.x_min = bbox.x_min.min(coord.x());
			bbox.y_min = bbox.y_min.min(coord.y());
			bbox.x_max = bbox.x_max.max(coord.x());
			bbox.y_max = bbox.y_max.max(coord.y());
		}
		Some(bbox)
	}

	/// Returns the bounding box as `[x_min, y_min, x_max, y_max]`.
	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x_min, self.y_min, self.x_max, self.y_max]
	}

	/// Expands the current bounding box in place so that it includes the area
	/// covered by `other`.
	pub fn extend(&mut self, other: &BoundingBox) {
		self.x_min = self.x_min.min(other.x_min);
		self.y_min = self.y_min.min(other.y_min);
		self.x_max = self.x_max.max(other.x_max);
		self.y_max = self.y_max.max(other.y_max);
	}

	/// Non-mutating version of [`extend`](Self::extend).
	#[must_use]
	pub fn extended(mut self, other: &BoundingBox) -> BoundingBox {
		self.extend(other);
		self
	}

	/// True if the two boxes share at least one point. Touching edges count.
	#[must_use]
	pub fn intersects_bbox(&self, other: &BoundingBox) -> bool {
		self.x_min <= other.x_max && other.x_min <= self.x_max && self.y_min <= other.y_max && other.y_min <= self.y_max
	}

	/// True if the point lies inside or on the border of the box.
	#[must_use]
	pub fn contains(&self, coord: &Coordinates) -> bool {
		self.x_min <= coord.x() && coord.x() <= self.x_max && self.y_min <= coord.y() && coord.y() <= self.y_max
	}

	/// The box as a closed, counterclockwise ring of five points.
	#[must_use]
	pub fn to_ring(&self) -> RingGeometry {
		RingGeometry::from(vec![
			[self.x_min, self.y_min],
			[self.x_max, self.y_min],
			[self.x_max, self.y_max],
			[self.x_min, self.y_max],
			[self.x_min, self.y_min],
		])
	}

	/// The box as a rectangular polygon, used as the query geometry of spatial filters.
	#[must_use]
	pub fn to_polygon(&self) -> PolygonGeometry {
		PolygonGeometry::from(vec![self.to_ring()])
	}

	fn checked(self) -> Result<Self, BoundingBoxError> {
		if !self.as_array().iter().all(|v| v.is_finite()) {
			return Err(BoundingBoxError::NotFinite);
		}
		if self.x_min > self.x_max {
			return Err(BoundingBoxError::InvertedX {
				min: self.x_min,
				max: self.x_max,
			});
		}
		if self.y_min > self.y_max {
			return Err(BoundingBoxError::InvertedY {
				min: self.y_min,
				max: self.y_max,
			});
		}
		Ok(self)
	}
}

/// Parses `"x_min,y_min,x_max,y_max"`. Whitespace around each value is ignored.
impl FromStr for BoundingBox {
	type Err = BoundingBoxError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
		if tokens.len() != 4 {
			return Err(BoundingBoxError::WrongTokenCount(tokens.len()));
		}
		let mut values = [0f64; 4];
		for (value, token) in values.iter_mut().zip(&tokens) {
			*value = token
				.parse::<f64>()
				.map_err(|_| BoundingBoxError::NotANumber((*token).to_string()))?;
		}
		BoundingBox::try_from(values)
	}
}

impl TryFrom<[f64; 4]> for BoundingBox {
	type Error = BoundingBoxError;

	fn try_from(input: [f64; 4]) -> Result<Self, Self::Error> {
		BoundingBox::new(input[0], input[1], input[2], input[3])
	}
}

impl fmt::Debug for BoundingBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"BoundingBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}

impl fmt::Display for BoundingBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CompositeGeometryTrait, GeometryTrait};
	use rstest::rstest;

	#[test]
	fn test_creation() {
		let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
		assert_eq!(bbox.x_min, -10.0);
		assert_eq!(bbox.y_min, -5.0);
		assert_eq!(bbox.x_max, 10.0);
		assert_eq!(bbox.y_max, 5.0);
	}

	#[test]
	fn test_degenerate_box_is_valid() {
		assert!(BoundingBox::new(3.0, 4.0, 3.0, 4.0).is_ok());
	}

	#[rstest]
	#[case("0,0,50,50", [0.0, 0.0, 50.0, 50.0])]
	#[case(" 1.5 , -2 ,3,4 ", [1.5, -2.0, 3.0, 4.0])]
	#[case("-180,-90,180,90", [-180.0, -90.0, 180.0, 90.0])]
	fn test_parse_valid(#[case] input: &str, #[case] expected: [f64; 4]) {
		let bbox: BoundingBox = input.parse().unwrap();
		assert_eq!(bbox.as_array(), expected);
	}

	#[rstest]
	#[case("1,2,3", BoundingBoxError::WrongTokenCount(3))]
	#[case("1,2,3,4,5", BoundingBoxError::WrongTokenCount(5))]
	#[case("", BoundingBoxError::WrongTokenCount(1))]
	#[case("a,2,3,4", BoundingBoxError::NotANumber("a".to_string()))]
	#[case("1,2,,4", BoundingBoxError::NotANumber(String::new()))]
	#[case("1,NaN,3,4", BoundingBoxError::NotFinite)]
	#[case("1,2,inf,4", BoundingBoxError::NotFinite)]
	#[case("5,0,1,1", BoundingBoxError::InvertedX { min: 5.0, max: 1.0 })]
	#[case("0,5,1,1", BoundingBoxError::InvertedY { min: 5.0, max: 1.0 })]
	fn test_parse_invalid(#[case] input: &str, #[case] expected: BoundingBoxError) {
		assert_eq!(input.parse::<BoundingBox>().unwrap_err(), expected);
	}

	#[test]
	fn test_from_coordinates() {
		let coords = [
			Coordinates::new(3.0, 1.0),
			Coordinates::new(-2.0, 7.0),
			Coordinates::new(5.0, -4.0),
		];
		let bbox = BoundingBox::from_coordinates(coords.iter()).unwrap();
		assert_eq!(bbox.as_array(), [-2.0, -4.0, 5.0, 7.0]);
		assert!(BoundingBox::from_coordinates([].iter()).is_none());
	}

	#[test]
	fn test_extended() {
		let bbox1 = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
		let bbox2 = BoundingBox::new(-12.0, -3.0, 8.0, 6.0).unwrap();
		let bbox3 = bbox1.extended(&bbox2);
		assert_eq!(bbox3.as_array(), [-12.0, -5.0, 10.0, 6.0]);
		assert_eq!(bbox1.as_array(), [-10.0, -5.0, 10.0, 5.0]);
	}

	#[test]
	fn test_intersects_bbox() {
		let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
		let touching = BoundingBox::new(10.0, 10.0, 20.0, 20.0).unwrap();
		let apart = BoundingBox::new(11.0, 0.0, 20.0, 10.0).unwrap();
		assert!(a.intersects_bbox(&touching));
		assert!(touching.intersects_bbox(&a));
		assert!(!a.intersects_bbox(&apart));
	}

	#[test]
	fn test_contains() {
		let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
		assert!(bbox.contains(&Coordinates::new(10.0, 0.0)));
		assert!(!bbox.contains(&Coordinates::new(10.1, 0.0)));
	}

	#[test]
	fn test_to_polygon() {
		let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
		let polygon = bbox.to_polygon();
		assert!(polygon.verify().is_ok());
		assert_eq!(polygon.len(), 1);
		assert_eq!(polygon.area(), 4.0);
		assert_eq!(polygon.compute_bounds(), Some(bbox));
	}

	#[test]
	fn test_debug_and_display() {
		let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
		assert_eq!(format!("{bbox:?}"), "BoundingBox(-10, -5, 10, 5)");
		assert_eq!(bbox.to_string(), "-10,-5,10,5");
	}
}
