//! Where features are kept.
//!
//! ```yaml
//! storage:
//!   backend: sqlite
//!   path: features.sqlite
//! ```
use anyhow::{Context, Result, bail};
use geostore_core::FeatureStore;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	/// Everything is lost when the process ends.
	#[default]
	Memory,
	Sqlite,
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
	#[serde(default)]
	pub backend: StorageBackend,

	/// Database file, required by the `sqlite` backend.
	/// A relative path is resolved against the directory of the config file.
	#[serde(default)]
	pub path: Option<PathBuf>,
}

impl StorageConfig {
	/// A database given on the command line always selects the `sqlite` backend.
	pub fn override_optional_database(&mut self, database: &Option<PathBuf>) {
		if let Some(path) = database {
			self.backend = StorageBackend::Sqlite;
			self.path = Some(path.clone());
		}
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		if let Some(path) = &self.path
			&& path.is_relative()
		{
			self.path = Some(base.join(path));
		}
	}

	pub fn open(&self) -> Result<FeatureStore> {
		match self.backend {
			StorageBackend::Memory => {
				log::info!("keeping features in memory");
				Ok(FeatureStore::in_memory())
			}
			StorageBackend::Sqlite => {
				let Some(path) = &self.path else {
					bail!("the sqlite storage backend needs a 'path'");
				};
				FeatureStore::open_sqlite(path).with_context(|| format!("opening database {path:?}"))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use geostore_core::FeatureKind;
	use pretty_assertions::assert_eq;

	#[test]
	fn database_flag_selects_sqlite() {
		let mut config = StorageConfig::default();
		config.override_optional_database(&None);
		assert_eq!(config.backend, StorageBackend::Memory);

		config.override_optional_database(&Some(PathBuf::from("db.sqlite")));
		assert_eq!(config.backend, StorageBackend::Sqlite);
		assert_eq!(config.path, Some(PathBuf::from("db.sqlite")));
	}

	#[test]
	fn relative_paths_are_resolved() {
		let mut config = StorageConfig {
			backend: StorageBackend::Sqlite,
			path: Some(PathBuf::from("db.sqlite")),
		};
		config.resolve_paths(Path::new("/etc/geostore"));
		assert_eq!(config.path, Some(PathBuf::from("/etc/geostore/db.sqlite")));

		config.resolve_paths(Path::new("/somewhere/else"));
		assert_eq!(config.path, Some(PathBuf::from("/etc/geostore/db.sqlite")));
	}

	#[test]
	fn sqlite_without_path_fails() {
		let config = StorageConfig {
			backend: StorageBackend::Sqlite,
			path: None,
		};
		assert!(config.open().is_err());
	}

	#[test]
	fn open_backends() {
		let store = StorageConfig::default().open().unwrap();
		assert_eq!(store.repository(FeatureKind::Park).count().unwrap(), 0);

		let dir = tempfile::tempdir().unwrap();
		let config = StorageConfig {
			backend: StorageBackend::Sqlite,
			path: Some(dir.path().join("features.sqlite")),
		};
		let store = config.open().unwrap();
		assert_eq!(store.repository(FeatureKind::Municipality).count().unwrap(), 0);
		assert!(dir.path().join("features.sqlite").exists());
	}
}
