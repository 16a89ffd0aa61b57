use crate::error::{FeatureError, Result};
use geostore_geometry::{BoundingBox, Geometry};
use serde_json::{Value, json};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The two feature collections. Each kind has its own repository and its own
/// name namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
	Municipality,
	Park,
}

impl FeatureKind {
	pub const ALL: [FeatureKind; 2] = [FeatureKind::Municipality, FeatureKind::Park];

	/// The URL path segment, e.g. `/api/features/dutch_municipality/`.
	#[must_use]
	pub fn slug(&self) -> &'static str {
		match self {
			FeatureKind::Municipality => "dutch_municipality",
			FeatureKind::Park => "park",
		}
	}

	#[must_use]
	pub fn table_name(&self) -> &'static str {
		match self {
			FeatureKind::Municipality => "dutch_municipality",
			FeatureKind::Park => "park",
		}
	}

	/// Municipalities are always stored as multipolygons; parks keep the variant they were given.
	#[must_use]
	pub fn normalize_geometry(&self, geometry: Geometry) -> Geometry {
		match self {
			FeatureKind::Municipality => geometry.into_multi(),
			FeatureKind::Park => geometry,
		}
	}
}

impl fmt::Display for FeatureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.slug())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature kind '{0}', expected 'dutch_municipality' or 'park'")]
pub struct UnknownKindError(pub String);

impl FromStr for FeatureKind {
	type Err = UnknownKindError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dutch_municipality" | "municipality" => Ok(FeatureKind::Municipality),
			"park" => Ok(FeatureKind::Park),
			other => Err(UnknownKindError(other.to_string())),
		}
	}
}

/// A stored feature.
///
/// `id` is assigned by the repository and survives updates; `name` is unique within its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
	pub id: u64,
	pub kind: FeatureKind,
	pub name: String,
	pub geometry: Geometry,
}

impl Feature {
	#[must_use]
	pub fn bounding_box(&self) -> BoundingBox {
		self.geometry.bounding_box()
	}

	/// The feature as a GeoJSON `Feature` object with the name as its only property.
	#[must_use]
	pub fn to_geojson(&self) -> Value {
		json!({
			"type": "Feature",
			"id": self.id,
			"geometry": self.geometry.to_json(),
			"properties": { "name": self.name },
		})
	}
}

/// Input for `create` and `bulk_create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeature {
	pub name: String,
	pub geometry: Geometry,
}

impl NewFeature {
	pub fn new(name: impl Into<String>, geometry: Geometry) -> NewFeature {
		NewFeature {
			name: name.into(),
			geometry,
		}
	}

	/// Checks the name and applies the geometry policy of `kind`.
	pub(crate) fn prepare(self, kind: FeatureKind) -> Result<NewFeature> {
		check_name(&self.name)?;
		Ok(NewFeature {
			name: self.name,
			geometry: kind.normalize_geometry(self.geometry),
		})
	}
}

/// Input for `update`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturePatch {
	pub name: Option<String>,
	pub geometry: Option<Geometry>,
}

impl FeaturePatch {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.geometry.is_none()
	}

	/// Reads a partial GeoJSON `Feature`: `properties.name` and `geometry` are both optional,
	/// but whatever is present must be valid.
	pub fn from_geojson_feature(value: &Value) -> Result<FeaturePatch> {
		let object = value
			.as_object()
			.ok_or_else(|| FeatureError::InvalidPayload("expected a GeoJSON Feature object".to_string()))?;

		let name = match object.get("properties").and_then(|p| p.get("name")) {
			None | Some(Value::Null) => None,
			Some(Value::String(name)) => Some(name.clone()),
			Some(_) => return Err(FeatureError::InvalidPayload("properties.name must be a string".to_string())),
		};

		let geometry = match object.get("geometry") {
			None | Some(Value::Null) => None,
			Some(raw) => Some(Geometry::parse(raw)?),
		};

		Ok(FeaturePatch { name, geometry })
	}

	/// Applies the patch to `feature`, checking the new name and applying the geometry policy.
	pub(crate) fn apply_to(self, feature: &Feature) -> Result<Feature> {
		let name = match self.name {
			Some(name) => {
				check_name(&name)?;
				name
			}
			None => feature.name.clone(),
		};
		let geometry = match self.geometry {
			Some(geometry) => feature.kind.normalize_geometry(geometry),
			None => feature.geometry.clone(),
		};
		Ok(Feature {
			id: feature.id,
			kind: feature.kind,
			name,
			geometry,
		})
	}
}

impl From<NewFeature> for FeaturePatch {
	fn from(feature: NewFeature) -> Self {
		FeaturePatch {
			name: Some(feature.name),
			geometry: Some(feature.geometry),
		}
	}
}

fn check_name(name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return Err(FeatureError::EmptyName);
	}
	Ok(())
}
