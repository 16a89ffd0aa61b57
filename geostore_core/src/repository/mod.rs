//! Storage of one feature collection.
//!
//! [`FeatureRepository`] is the port every backend implements. The store keeps
//! one instance per [`FeatureKind`]; names are unique within a repository.
//!
//! Backends:
//! - [`MemoryRepository`]: a locked map plus an R-tree of feature envelopes
//! - [`SqliteRepository`]: one table per kind in a pooled SQLite database

mod memory;
mod sqlite;

pub use memory::MemoryRepository;
pub use sqlite::SqliteRepository;
pub(crate) use sqlite::open_pool as sqlite_pool;

use crate::{
	error::Result,
	feature::{Feature, FeatureKind, FeaturePatch, NewFeature},
};
use geostore_geometry::BoundingBox;
use std::{collections::HashSet, fmt::Debug};

/// Result of [`FeatureRepository::bulk_create`].
///
/// `rejected` holds the names that were skipped because they were already taken,
/// either by a stored feature or by an earlier item of the same batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkInsert {
	pub accepted: Vec<Feature>,
	pub rejected: Vec<String>,
}

impl BulkInsert {
	#[must_use]
	pub fn accepted_count(&self) -> usize {
		self.accepted.len()
	}

	#[must_use]
	pub fn rejected_count(&self) -> usize {
		self.rejected.len()
	}
}

/// Persistence and retrieval of the features of one kind.
///
/// Every mutating call checks name uniqueness atomically with the write,
/// so concurrent callers can never store two features with the same name.
pub trait FeatureRepository: Send + Sync + Debug {
	fn kind(&self) -> FeatureKind;

	/// Fails with `NotFound` if there is no such feature.
	fn get_by_name(&self, name: &str) -> Result<Feature>;

	/// All features, ascending by name.
	fn list_all(&self) -> Result<Vec<Feature>>;

	/// Snapshot of all stored names.
	fn names(&self) -> Result<HashSet<String>>;

	/// Exactly those features whose geometry intersects the rectangle `bbox`, ascending by name.
	fn filter_by_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Feature>>;

	/// Stores a single feature. Fails with `DuplicateName` if the name is taken.
	fn create(&self, feature: NewFeature) -> Result<Feature>;

	/// Stores many features in one atomic step.
	///
	/// Items whose name is taken are skipped and listed in [`BulkInsert::rejected`].
	/// On a storage fault nothing from this call is persisted.
	fn bulk_create(&self, features: Vec<NewFeature>) -> Result<BulkInsert>;

	/// Changes the feature currently called `name` in place; its id stays the same.
	///
	/// Fails with `NotFound` if `name` does not exist and with `DuplicateName` if the new
	/// name belongs to another feature. On failure the feature is unchanged.
	fn update(&self, name: &str, patch: FeaturePatch) -> Result<Feature>;

	/// Fails with `NotFound` if there is no such feature.
	fn delete(&self, name: &str) -> Result<()>;

	fn count(&self) -> Result<usize>;
}
