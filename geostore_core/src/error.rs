use geostore_geometry::{BoundingBoxError, GeometryError};
use std::fmt;
use thiserror::Error;

pub type Result<T, E = FeatureError> = std::result::Result<T, E>;

/// Everything that can go wrong when reading or writing features.
///
/// Bulk operations report item-level failures (`DuplicateName`, `MissingGeometry`,
/// `InvalidGeometry`) per item and keep going. `StorageFault` always aborts the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
	#[error("invalid geometry: {0}")]
	InvalidGeometry(#[from] GeometryError),

	#[error("invalid bounding box: {0}")]
	InvalidBoundingBox(#[from] BoundingBoxError),

	#[error("a feature named '{0}' already exists")]
	DuplicateName(String),

	#[error("no feature named '{0}'")]
	NotFound(String),

	#[error("feature has no geometry")]
	MissingGeometry,

	#[error("feature name must not be empty")]
	EmptyName,

	#[error("invalid payload: {0}")]
	InvalidPayload(String),

	#[error("storage fault: {0}")]
	StorageFault(String),
}

impl FeatureError {
	#[must_use]
	pub fn kind(&self) -> ErrorKind {
		use FeatureError::*;
		match self {
			InvalidGeometry(_) => ErrorKind::InvalidGeometry,
			InvalidBoundingBox(_) => ErrorKind::InvalidBoundingBox,
			DuplicateName(_) => ErrorKind::DuplicateName,
			NotFound(_) => ErrorKind::NotFound,
			MissingGeometry => ErrorKind::MissingGeometry,
			EmptyName => ErrorKind::EmptyName,
			InvalidPayload(_) => ErrorKind::InvalidPayload,
			StorageFault(_) => ErrorKind::StorageFault,
		}
	}

	/// Wraps a backend error and logs it.
	pub(crate) fn storage(error: impl fmt::Display) -> FeatureError {
		log::error!("storage fault: {error}");
		FeatureError::StorageFault(error.to_string())
	}
}

/// Stable, payload-free classification of a [`FeatureError`],
/// used in rejection reports and HTTP error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	InvalidGeometry,
	InvalidBoundingBox,
	DuplicateName,
	NotFound,
	MissingGeometry,
	EmptyName,
	InvalidPayload,
	StorageFault,
}

impl ErrorKind {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::InvalidGeometry => "InvalidGeometry",
			ErrorKind::InvalidBoundingBox => "InvalidBoundingBox",
			ErrorKind::DuplicateName => "DuplicateName",
			ErrorKind::NotFound => "NotFound",
			ErrorKind::MissingGeometry => "MissingGeometry",
			ErrorKind::EmptyName => "EmptyName",
			ErrorKind::InvalidPayload => "InvalidPayload",
			ErrorKind::StorageFault => "StorageFault",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
