use crate::{
	error::Result,
	feature::FeatureKind,
	repository::{FeatureRepository, MemoryRepository, SqliteRepository, sqlite_pool},
};
use std::{path::Path, sync::Arc};

/// One repository per [`FeatureKind`].
///
/// Cloning is cheap; clones share the repositories.
#[derive(Debug, Clone)]
pub struct FeatureStore {
	municipalities: Arc<dyn FeatureRepository>,
	parks: Arc<dyn FeatureRepository>,
}

impl FeatureStore {
	pub fn new(municipalities: Arc<dyn FeatureRepository>, parks: Arc<dyn FeatureRepository>) -> FeatureStore {
		FeatureStore { municipalities, parks }
	}

	#[must_use]
	pub fn in_memory() -> FeatureStore {
		FeatureStore::new(
			Arc::new(MemoryRepository::new(FeatureKind::Municipality)),
			Arc::new(MemoryRepository::new(FeatureKind::Park)),
		)
	}

	/// Opens a SQLite database file; both kinds share it, each in its own table.
	pub fn open_sqlite(path: &Path) -> Result<FeatureStore> {
		log::info!("opening feature database {:?}", path);
		let pool = sqlite_pool(path)?;
		Ok(FeatureStore::new(
			Arc::new(SqliteRepository::new(FeatureKind::Municipality, pool.clone())?),
			Arc::new(SqliteRepository::new(FeatureKind::Park, pool)?),
		))
	}

	#[must_use]
	pub fn repository(&self, kind: FeatureKind) -> &Arc<dyn FeatureRepository> {
		match kind {
			FeatureKind::Municipality => &self.municipalities,
			FeatureKind::Park => &self.parks,
		}
	}
}
