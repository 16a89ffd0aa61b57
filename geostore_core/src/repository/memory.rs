use super::{BulkInsert, FeatureRepository};
use crate::{
	error::{FeatureError, Result},
	feature::{Feature, FeatureKind, FeaturePatch, NewFeature},
};
use geostore_geometry::BoundingBox;
use parking_lot::RwLock;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::{HashMap, HashSet};

/// Envelope of one stored feature in the spatial index.
#[derive(Debug, Clone, PartialEq)]
struct IndexEntry {
	id: u64,
	envelope: AABB<[f64; 2]>,
}

impl IndexEntry {
	fn new(feature: &Feature) -> IndexEntry {
		IndexEntry {
			id: feature.id,
			envelope: envelope(&feature.bounding_box()),
		}
	}
}

impl RTreeObject for IndexEntry {
	type Envelope = AABB<[f64; 2]>;

	fn envelope(&self) -> Self::Envelope {
		self.envelope
	}
}

fn envelope(bbox: &BoundingBox) -> AABB<[f64; 2]> {
	AABB::from_corners([bbox.x_min, bbox.y_min], [bbox.x_max, bbox.y_max])
}

#[derive(Debug, Default)]
struct State {
	next_id: u64,
	features: HashMap<u64, Feature>,
	ids_by_name: HashMap<String, u64>,
	index: RTree<IndexEntry>,
}

impl State {
	fn insert(&mut self, kind: FeatureKind, feature: NewFeature) -> Feature {
		self.next_id += 1;
		let feature = Feature {
			id: self.next_id,
			kind,
			name: feature.name,
			geometry: feature.geometry,
		};
		self.index.insert(IndexEntry::new(&feature));
		self.ids_by_name.insert(feature.name.clone(), feature.id);
		self.features.insert(feature.id, feature.clone());
		feature
	}

	fn lookup(&self, name: &str) -> Result<&Feature> {
		self
			.ids_by_name
			.get(name)
			.and_then(|id| self.features.get(id))
			.ok_or_else(|| FeatureError::NotFound(name.to_string()))
	}

	fn sorted<'a>(features: impl Iterator<Item = &'a Feature>) -> Vec<Feature> {
		let mut list: Vec<Feature> = features.cloned().collect();
		list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
		list
	}
}

/// Keeps the features of one kind in memory.
///
/// One `RwLock` guards the whole collection: reads run in parallel, writes
/// are serialized, so every uniqueness check happens under the same lock as
/// the write it protects. Bounding-box queries first select candidates from an
/// R-tree of envelopes and then run the exact intersection test.
#[derive(Debug)]
pub struct MemoryRepository {
	kind: FeatureKind,
	state: RwLock<State>,
}

impl MemoryRepository {
	#[must_use]
	pub fn new(kind: FeatureKind) -> MemoryRepository {
		MemoryRepository {
			kind,
			state: RwLock::new(State::default()),
		}
	}
}

impl FeatureRepository for MemoryRepository {
	fn kind(&self) -> FeatureKind {
		self.kind
	}

	fn get_by_name(&self, name: &str) -> Result<Feature> {
		self.state.read().lookup(name).cloned()
	}

	fn list_all(&self) -> Result<Vec<Feature>> {
		Ok(State::sorted(self.state.read().features.values()))
	}

	fn names(&self) -> Result<HashSet<String>> {
		Ok(self.state.read().ids_by_name.keys().cloned().collect())
	}

	fn filter_by_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Feature>> {
		let state = self.state.read();
		let candidates = state
			.index
			.locate_in_envelope_intersecting(&envelope(bbox))
			.filter_map(|entry| state.features.get(&entry.id))
			.filter(|feature| feature.geometry.intersects_bbox(bbox));
		Ok(State::sorted(candidates))
	}

	fn create(&self, feature: NewFeature) -> Result<Feature> {
		let feature = feature.prepare(self.kind)?;
		let mut state = self.state.write();
		if state.ids_by_name.contains_key(&feature.name) {
			return Err(FeatureError::DuplicateName(feature.name));
		}
		let feature = state.insert(self.kind, feature);
		log::debug!("created {} '{}' with id {}", self.kind, feature.name, feature.id);
		Ok(feature)
	}

	fn bulk_create(&self, features: Vec<NewFeature>) -> Result<BulkInsert> {
		let features = features
			.into_iter()
			.map(|feature| feature.prepare(self.kind))
			.collect::<Result<Vec<_>>>()?;

		let mut result = BulkInsert::default();
		let mut state = self.state.write();
		for feature in features {
			// names inserted earlier in this loop are already in `ids_by_name`
			if state.ids_by_name.contains_key(&feature.name) {
				result.rejected.push(feature.name);
			} else {
				result.accepted.push(state.insert(self.kind, feature));
			}
		}
		log::debug!(
			"bulk created {} {} features, skipped {}",
			result.accepted_count(),
			self.kind,
			result.rejected_count()
		);
		Ok(result)
	}

	fn update(&self, name: &str, patch: FeaturePatch) -> Result<Feature> {
		let mut state = self.state.write();
		let current = state.lookup(name)?;
		let updated = patch.apply_to(current)?;

		if updated.name != current.name && state.ids_by_name.contains_key(&updated.name) {
			return Err(FeatureError::DuplicateName(updated.name));
		}

		let old_entry = IndexEntry::new(current);
		let old_name = current.name.clone();
		state.index.remove(&old_entry);
		state.index.insert(IndexEntry::new(&updated));
		state.ids_by_name.remove(&old_name);
		state.ids_by_name.insert(updated.name.clone(), updated.id);
		state.features.insert(updated.id, updated.clone());
		log::debug!("updated {} '{}' (id {})", self.kind, updated.name, updated.id);
		Ok(updated)
	}

	fn delete(&self, name: &str) -> Result<()> {
		let mut state = self.state.write();
		let id = *state
			.ids_by_name
			.get(name)
			.ok_or_else(|| FeatureError::NotFound(name.to_string()))?;
		if let Some(feature) = state.features.remove(&id) {
			state.index.remove(&IndexEntry::new(&feature));
		}
		state.ids_by_name.remove(name);
		log::debug!("deleted {} '{name}'", self.kind);
		Ok(())
	}

	fn count(&self) -> Result<usize> {
		Ok(self.state.read().features.len())
	}
}
