//! Bulk ingest of GeoJSON features.
//!
//! Every candidate is validated on its own; a bad item is reported and skipped
//! while the rest of the batch goes through. The steps per candidate, in input order:
//!
//! 1. no geometry → `MissingGeometry`
//! 2. unparseable geometry → `InvalidGeometry`
//! 3. no name, or a blank one → the name [`DEFAULT_NAME`]
//! 4. name already stored, or used earlier in the batch → `DuplicateName`
//!
//! The survivors are committed with a single [`FeatureRepository::bulk_create`].
//! That call checks the names again under the repository's write lock, so a
//! concurrent ingest can never sneak in a duplicate; the names it refuses are
//! reported as `DuplicateName` as well.

use crate::{
	error::{ErrorKind, FeatureError, Result},
	feature::{Feature, NewFeature},
	repository::FeatureRepository,
};
use geostore_geometry::Geometry;
use serde_json::Value;
use std::collections::HashSet;

/// Name given to features that arrive without one.
pub const DEFAULT_NAME: &str = "Unknown";

/// One item of an ingest batch, as it came in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestCandidate {
	pub name: Option<String>,
	pub geometry: Option<Value>,
}

impl IngestCandidate {
	pub fn new(name: Option<&str>, geometry: Option<Value>) -> IngestCandidate {
		IngestCandidate {
			name: name.map(str::to_string),
			geometry,
		}
	}

	/// Reads `properties.name` and `geometry` of a GeoJSON `Feature`.
	/// Numeric and boolean names are turned into their text; arrays, objects and null count as missing.
	#[must_use]
	pub fn from_geojson_feature(value: &Value) -> IngestCandidate {
		let name = match value.get("properties").and_then(|p| p.get("name")) {
			Some(Value::String(name)) => Some(name.clone()),
			Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
			_ => None,
		};
		IngestCandidate {
			name,
			geometry: value.get("geometry").filter(|g| !g.is_null()).cloned(),
		}
	}
}

/// Reads the `features` array of a GeoJSON `FeatureCollection`.
///
/// Fails with `InvalidPayload` if there is no such array.
pub fn candidates_from_feature_collection(value: &Value) -> Result<Vec<IngestCandidate>> {
	let features = value
		.get("features")
		.and_then(Value::as_array)
		.ok_or_else(|| FeatureError::InvalidPayload("expected a FeatureCollection with a 'features' array".to_string()))?;
	Ok(features.iter().map(IngestCandidate::from_geojson_feature).collect())
}

/// A candidate that was not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
	/// Position in the input batch.
	pub index: usize,
	pub name: Option<String>,
	pub reason: FeatureError,
}

impl Rejection {
	#[must_use]
	pub fn kind(&self) -> ErrorKind {
		self.reason.kind()
	}
}

/// Output of [`prepare_batch`]: the features to commit, each with its input index,
/// and the candidates that failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedBatch {
	pub accepted: Vec<(usize, NewFeature)>,
	pub rejections: Vec<Rejection>,
}

/// Validates and de-duplicates a batch against a snapshot of the `existing` names.
///
/// Pure: nothing is stored.
#[must_use]
pub fn prepare_batch(existing: &HashSet<String>, candidates: Vec<IngestCandidate>) -> PreparedBatch {
	let mut batch = PreparedBatch::default();
	let mut claimed: HashSet<String> = HashSet::new();

	for (index, candidate) in candidates.into_iter().enumerate() {
		let mut reject = |name: Option<String>, reason: FeatureError| {
			log::warn!("rejecting feature #{index} ({}): {reason}", name.as_deref().unwrap_or("unnamed"));
			batch.rejections.push(Rejection { index, name, reason });
		};

		let Some(raw) = candidate.geometry.filter(|g| !g.is_null()) else {
			reject(candidate.name, FeatureError::MissingGeometry);
			continue;
		};
		let geometry = match Geometry::parse(&raw) {
			Ok(geometry) => geometry,
			Err(error) => {
				reject(candidate.name, error.into());
				continue;
			}
		};

		let name = match candidate.name {
			Some(name) if !name.trim().is_empty() => name,
			_ => DEFAULT_NAME.to_string(),
		};
		if existing.contains(&name) || claimed.contains(&name) {
			reject(Some(name.clone()), FeatureError::DuplicateName(name));
			continue;
		}

		claimed.insert(name.clone());
		batch.accepted.push((index, NewFeature::new(name, geometry)));
	}

	batch
}

/// Result of [`ingest`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
	pub accepted: Vec<Feature>,
	/// Sorted by input index.
	pub rejections: Vec<Rejection>,
}

impl IngestReport {
	#[must_use]
	pub fn accepted_count(&self) -> usize {
		self.accepted.len()
	}

	#[must_use]
	pub fn rejected_count(&self) -> usize {
		self.rejections.len()
	}
}

/// Validates a batch and stores what survives. A storage fault aborts the whole call.
pub fn ingest(repository: &dyn FeatureRepository, candidates: Vec<IngestCandidate>) -> Result<IngestReport> {
	if candidates.is_empty() {
		return Ok(IngestReport::default());
	}
	let total = candidates.len();

	let existing = repository.names()?;
	let PreparedBatch { accepted, mut rejections } = prepare_batch(&existing, candidates);

	let (indices, features): (Vec<usize>, Vec<NewFeature>) = accepted.into_iter().unzip();
	let names: Vec<String> = features.iter().map(|f| f.name.clone()).collect();
	let committed = repository.bulk_create(features)?;

	// names taken between the snapshot and the commit
	let refused: HashSet<&str> = committed.rejected.iter().map(String::as_str).collect();
	for (index, name) in indices.into_iter().zip(names) {
		if refused.contains(name.as_str()) {
			log::warn!("rejecting feature #{index} ({name}): name was taken concurrently");
			rejections.push(Rejection {
				index,
				reason: FeatureError::DuplicateName(name.clone()),
				name: Some(name),
			});
		}
	}
	rejections.sort_by_key(|r| r.index);

	let report = IngestReport {
		accepted: committed.accepted,
		rejections,
	};
	log::info!(
		"ingested {} of {total} {} features, rejected {}",
		report.accepted_count(),
		repository.kind(),
		report.rejected_count()
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		FeatureKind,
		repository::{BulkInsert, MemoryRepository},
	};
	use geostore_geometry::BoundingBox;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use serde_json::json;

	fn appingedam_geometry() -> Value {
		json!({
			"type": "MultiPolygon",
			"coordinates": [
				[[[30, 20], [45, 40], [10, 40], [30, 20]]],
				[[[15, 5], [40, 10], [10, 20], [5, 10], [15, 5]]]
			]
		})
	}

	fn square(x: f64) -> Value {
		json!({
			"type": "Polygon",
			"coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
		})
	}

	fn kinds(report: &IngestReport) -> Vec<(usize, ErrorKind)> {
		report.rejections.iter().map(|r| (r.index, r.kind())).collect()
	}

	#[test]
	fn appingedam_twice() {
		let repo = MemoryRepository::new(FeatureKind::Municipality);
		let batch = vec![IngestCandidate::new(Some("Appingedam"), Some(appingedam_geometry()))];

		let first = ingest(&repo, batch.clone()).unwrap();
		assert_eq!(first.accepted_count(), 1);
		assert!(first.rejections.is_empty());

		let second = ingest(&repo, batch).unwrap();
		assert_eq!(second.accepted_count(), 0);
		assert_eq!(kinds(&second), [(0, ErrorKind::DuplicateName)]);
		assert_eq!(second.rejections[0].name.as_deref(), Some("Appingedam"));
		assert_eq!(repo.count().unwrap(), 1);

		let found = crate::query::query_bounding_box(&repo, "0,0,50,50").unwrap();
		assert_eq!(found, first.accepted);
		assert!(crate::query::query_bounding_box(&repo, "1,2,3").is_err());
	}

	#[test]
	fn per_item_rejections() {
		let repo = MemoryRepository::new(FeatureKind::Park);
		let report = ingest(
			&repo,
			vec![
				IngestCandidate::new(Some("a"), Some(square(0.0))),
				IngestCandidate::new(Some("no geometry"), None),
				IngestCandidate::new(Some("null geometry"), Some(Value::Null)),
				IngestCandidate::new(Some("point"), Some(json!({"type": "Point", "coordinates": [0, 0]}))),
				IngestCandidate::new(Some("a"), Some(square(5.0))),
				IngestCandidate::new(Some("b"), Some(square(10.0))),
			],
		)
		.unwrap();

		let accepted: Vec<&str> = report.accepted.iter().map(|f| f.name.as_str()).collect();
		assert_eq!(accepted, ["a", "b"]);
		assert_eq!(
			kinds(&report),
			[
				(1, ErrorKind::MissingGeometry),
				(2, ErrorKind::MissingGeometry),
				(3, ErrorKind::InvalidGeometry),
				(4, ErrorKind::DuplicateName),
			]
		);
		// the first "a" wins
		assert_eq!(repo.get_by_name("a").unwrap().bounding_box().x_min, 0.0);
	}

	#[test]
	fn missing_names_become_unknown() {
		let repo = MemoryRepository::new(FeatureKind::Park);
		let report = ingest(
			&repo,
			vec![
				IngestCandidate::new(None, Some(square(0.0))),
				IngestCandidate::new(Some("  "), Some(square(2.0))),
			],
		)
		.unwrap();
		assert_eq!(report.accepted_count(), 1);
		assert_eq!(report.accepted[0].name, DEFAULT_NAME);
		assert_eq!(kinds(&report), [(1, ErrorKind::DuplicateName)]);
	}

	#[test]
	fn empty_batch() {
		let repo = MemoryRepository::new(FeatureKind::Park);
		assert_eq!(ingest(&repo, vec![]).unwrap(), IngestReport::default());
	}

	#[test]
	fn ingest_is_idempotent() {
		let repo = MemoryRepository::new(FeatureKind::Park);
		let batch: Vec<IngestCandidate> = (0..10u8)
			.map(|i| IngestCandidate::new(Some(format!("park {}", i % 7).as_str()), Some(square(f64::from(i)))))
			.collect();
		ingest(&repo, batch.clone()).unwrap();
		let names_before = repo.names().unwrap();
		let second = ingest(&repo, batch).unwrap();
		assert_eq!(second.accepted_count(), 0);
		assert_eq!(repo.names().unwrap(), names_before);
		assert_eq!(repo.count().unwrap(), 7);
	}

	#[test]
	fn prepare_batch_uses_snapshot() {
		let existing = HashSet::from(["taken".to_string()]);
		let batch = prepare_batch(
			&existing,
			vec![
				IngestCandidate::new(Some("taken"), Some(square(0.0))),
				IngestCandidate::new(Some("free"), Some(square(0.0))),
			],
		);
		assert_eq!(batch.accepted.len(), 1);
		assert_eq!(batch.accepted[0].0, 1);
		assert_eq!(batch.accepted[0].1.name, "free");
		assert_eq!(
			batch.rejections,
			[Rejection {
				index: 0,
				name: Some("taken".to_string()),
				reason: FeatureError::DuplicateName("taken".to_string()),
			}]
		);
	}

	/// Simulates another writer that claims a name between the snapshot and the commit.
	#[derive(Debug)]
	struct Racing {
		inner: MemoryRepository,
		stolen: &'static str,
	}

	impl FeatureRepository for Racing {
		fn kind(&self) -> FeatureKind {
			self.inner.kind()
		}
		fn get_by_name(&self, name: &str) -> Result<Feature> {
			self.inner.get_by_name(name)
		}
		fn list_all(&self) -> Result<Vec<Feature>> {
			self.inner.list_all()
		}
		fn names(&self) -> Result<HashSet<String>> {
			let names = self.inner.names()?;
			let geometry = Geometry::parse(&square(50.0))?;
			self.inner.create(NewFeature::new(self.stolen, geometry))?;
			Ok(names)
		}
		fn filter_by_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Feature>> {
			self.inner.filter_by_bounding_box(bbox)
		}
		fn create(&self, feature: NewFeature) -> Result<Feature> {
			self.inner.create(feature)
		}
		fn bulk_create(&self, features: Vec<NewFeature>) -> Result<BulkInsert> {
			self.inner.bulk_create(features)
		}
		fn update(&self, name: &str, patch: crate::FeaturePatch) -> Result<Feature> {
			self.inner.update(name, patch)
		}
		fn delete(&self, name: &str) -> Result<()> {
			self.inner.delete(name)
		}
		fn count(&self) -> Result<usize> {
			self.inner.count()
		}
	}

	#[test]
	fn commit_time_duplicates_are_reported() {
		let repo = Racing {
			inner: MemoryRepository::new(FeatureKind::Park),
			stolen: "contested",
		};
		let report = ingest(
			&repo,
			vec![
				IngestCandidate::new(Some("fine"), Some(square(0.0))),
				IngestCandidate::new(None, None),
				IngestCandidate::new(Some("contested"), Some(square(2.0))),
			],
		)
		.unwrap();
		assert_eq!(report.accepted_count(), 1);
		assert_eq!(
			kinds(&report),
			[(1, ErrorKind::MissingGeometry), (2, ErrorKind::DuplicateName)]
		);
		assert_eq!(repo.count().unwrap(), 2);
		assert_eq!(repo.get_by_name("contested").unwrap().bounding_box().x_min, 50.0);
	}

	#[test]
	fn from_geojson_feature() {
		let candidate = IngestCandidate::from_geojson_feature(&json!({
			"type": "Feature",
			"properties": {"name": "Appingedam", "population": 11801},
			"geometry": appingedam_geometry()
		}));
		assert_eq!(candidate.name.as_deref(), Some("Appingedam"));
		assert_eq!(candidate.geometry, Some(appingedam_geometry()));

		let candidate = IngestCandidate::from_geojson_feature(&json!({"type": "Feature", "geometry": null}));
		assert_eq!(candidate, IngestCandidate::default());
	}

	#[rstest]
	#[case(json!("Delfzijl"), Some("Delfzijl"))]
	#[case(json!(5), Some("5"))]
	#[case(json!(2.5), Some("2.5"))]
	#[case(json!(true), Some("true"))]
	#[case(json!(null), None)]
	#[case(json!(["a"]), None)]
	#[case(json!({"nl": "Delfzijl"}), None)]
	fn scalar_names_are_kept_as_text(#[case] name: Value, #[case] expected: Option<&str>) {
		let candidate = IngestCandidate::from_geojson_feature(&json!({
			"type": "Feature",
			"properties": {"name": name},
			"geometry": square(0.0)
		}));
		assert_eq!(candidate.name.as_deref(), expected);
	}

	#[test]
	fn numeric_name_is_stored_as_text() {
		let repo = MemoryRepository::new(FeatureKind::Park);
		let candidates = candidates_from_feature_collection(&json!({
			"type": "FeatureCollection",
			"features": [{"type": "Feature", "properties": {"name": 5}, "geometry": square(0.0)}]
		}))
		.unwrap();
		let report = ingest(&repo, candidates).unwrap();
		assert_eq!(report.accepted[0].name, "5");
		assert_eq!(repo.get_by_name("5").unwrap().name, "5");
	}

	#[test]
	fn feature_collection() {
		let candidates = candidates_from_feature_collection(&json!({
			"type": "FeatureCollection",
			"features": [
				{"type": "Feature", "properties": {"name": "a"}, "geometry": square(0.0)},
				{"type": "Feature", "properties": {}}
			]
		}))
		.unwrap();
		assert_eq!(candidates.len(), 2);
		assert_eq!(candidates[1], IngestCandidate::default());

		let error = candidates_from_feature_collection(&json!({"type": "Feature"})).unwrap_err();
		assert_eq!(error.kind(), ErrorKind::InvalidPayload);
	}
}
