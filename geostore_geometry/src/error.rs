use thiserror::Error;

/// Reasons a geometry payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
	#[error("geometry must be a JSON object")]
	NotAnObject,

	#[error("geometry must have a type")]
	MissingType,

	#[error("unknown geometry type '{0}', expected 'Polygon' or 'MultiPolygon'")]
	UnknownType(String),

	#[error("geometry must have coordinates")]
	MissingCoordinates,

	#[error("malformed coordinates: {0}")]
	Malformed(String),

	#[error("position must consist of exactly two finite numbers")]
	InvalidPosition,

	#[error("ring must have at least 4 points, but has {0}")]
	TooFewPoints(usize),

	#[error("ring must be closed (first and last point must be identical)")]
	RingNotClosed,

	#[error("polygon must have at least one ring")]
	EmptyPolygon,

	#[error("multipolygon must have at least one polygon")]
	EmptyMultiPolygon,
}

/// Reasons a bounding box is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
	#[error("bounding box must contain exactly 4 comma-separated coordinates, but has {0}")]
	WrongTokenCount(usize),

	#[error("bounding box coordinate '{0}' is not a number")]
	NotANumber(String),

	#[error("bounding box coordinates must be finite")]
	NotFinite,

	#[error("x_min ({min}) must be <= x_max ({max})")]
	InvertedX { min: f64, max: f64 },

	#[error("y_min ({min}) must be <= y_max ({max})")]
	InvertedY { min: f64, max: f64 },
}
