//! SQLite backend.
//!
//! Each kind gets its own table:
//!
//! ```sql
//! CREATE TABLE park (
//!   id INTEGER PRIMARY KEY,
//!   name TEXT NOT NULL UNIQUE,
//!   geometry TEXT NOT NULL,   -- GeoJSON geometry object
//!   x_min REAL, y_min REAL, x_max REAL, y_max REAL
//! );
//! ```
//!
//! The envelope columns are indexed and used to prefilter bounding-box queries in SQL;
//! the exact intersection test runs on the decoded geometries. All writes run in
//! `IMMEDIATE` transactions, and the `UNIQUE` constraint backs up the name checks.

use super::{BulkInsert, FeatureRepository};
use crate::{
	error::{FeatureError, Result},
	feature::{Feature, FeatureKind, FeaturePatch, NewFeature},
};
use geostore_geometry::{BoundingBox, Geometry};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{self, Connection, OptionalExtension, Row, TransactionBehavior, params},
};
use std::{collections::HashSet, fmt, path::Path, time::Duration};

const COLUMNS: &str = "id, name, geometry";

pub struct SqliteRepository {
	kind: FeatureKind,
	pool: Pool<SqliteConnectionManager>,
}

impl SqliteRepository {
	/// Opens (or creates) the database at `path` with its own connection pool.
	pub fn open(kind: FeatureKind, path: &Path) -> Result<SqliteRepository> {
		SqliteRepository::new(kind, open_pool(path)?)
	}

	/// Uses an existing pool, so that several kinds can share one database file.
	/// Creates the table of `kind` if it does not exist yet.
	pub fn new(kind: FeatureKind, pool: Pool<SqliteConnectionManager>) -> Result<SqliteRepository> {
		let table = kind.table_name();
		pool.get().map_err(FeatureError::storage)?.execute_batch(&format!(
			"CREATE TABLE IF NOT EXISTS {table} (
				id INTEGER PRIMARY KEY,
				name TEXT NOT NULL UNIQUE,
				geometry TEXT NOT NULL,
				x_min REAL NOT NULL, y_min REAL NOT NULL, x_max REAL NOT NULL, y_max REAL NOT NULL
			);
			CREATE INDEX IF NOT EXISTS {table}_envelope ON {table} (x_min, x_max, y_min, y_max);"
		))
		.map_err(FeatureError::storage)?;
		Ok(SqliteRepository { kind, pool })
	}

	fn table(&self) -> &'static str {
		self.kind.table_name()
	}

	fn connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
		self.pool.get().map_err(FeatureError::storage)
	}

	fn decode(&self, (id, name, geometry): (i64, String, String)) -> Result<Feature> {
		let value: serde_json::Value = serde_json::from_str(&geometry).map_err(FeatureError::storage)?;
		let geometry = Geometry::parse(&value).map_err(FeatureError::storage)?;
		Ok(Feature {
			id: id as u64,
			kind: self.kind,
			name,
			geometry,
		})
	}

	fn query_features(&self, conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Feature>> {
		let mut statement = conn.prepare(sql).map_err(FeatureError::storage)?;
		let rows = statement
			.query_map(params, read_row)
			.map_err(FeatureError::storage)?
			.collect::<rusqlite::Result<Vec<_>>>()
			.map_err(FeatureError::storage)?;
		rows.into_iter().map(|row| self.decode(row)).collect()
	}

	fn find(&self, conn: &Connection, name: &str) -> Result<Option<Feature>> {
		let row = conn
			.query_row(
				&format!("SELECT {COLUMNS} FROM {} WHERE name = ?1", self.table()),
				params![name],
				read_row,
			)
			.optional()
			.map_err(FeatureError::storage)?;
		row.map(|row| self.decode(row)).transpose()
	}

	fn insert(&self, conn: &Connection, feature: NewFeature) -> Result<Feature> {
		let bbox = feature.geometry.bounding_box();
		conn
			.execute(
				&format!(
					"INSERT INTO {} (name, geometry, x_min, y_min, x_max, y_max) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
					self.table()
				),
				params![
					feature.name,
					feature.geometry.to_json().to_string(),
					bbox.x_min,
					bbox.y_min,
					bbox.x_max,
					bbox.y_max
				],
			)
			.map_err(|e| map_write_error(e, &feature.name))?;
		Ok(Feature {
			id: conn.last_insert_rowid() as u64,
			kind: self.kind,
			name: feature.name,
			geometry: feature.geometry,
		})
	}
}

fn read_row(row: &Row) -> rusqlite::Result<(i64, String, String)> {
	Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

/// Opens a pool on a database file. Connections wait for locks instead of failing immediately.
pub(crate) fn open_pool(path: &Path) -> Result<Pool<SqliteConnectionManager>> {
	let manager = SqliteConnectionManager::file(path).with_init(|c| c.busy_timeout(Duration::from_secs(10)));
	Pool::builder().max_size(10).build(manager).map_err(FeatureError::storage)
}

/// UNIQUE violations become `DuplicateName`; everything else is a storage fault.
fn map_write_error(error: rusqlite::Error, name: &str) -> FeatureError {
	match &error {
		rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
			FeatureError::DuplicateName(name.to_string())
		}
		_ => FeatureError::storage(error),
	}
}

impl fmt::Debug for SqliteRepository {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SqliteRepository")
			.field("kind", &self.kind)
			.field("table", &self.table())
			.finish()
	}
}

impl FeatureRepository for SqliteRepository {
	fn kind(&self) -> FeatureKind {
		self.kind
	}

	fn get_by_name(&self, name: &str) -> Result<Feature> {
		let conn = self.connection()?;
		self
			.find(&conn, name)?
			.ok_or_else(|| FeatureError::NotFound(name.to_string()))
	}

	fn list_all(&self) -> Result<Vec<Feature>> {
		let conn = self.connection()?;
		self.query_features(
			&conn,
			&format!("SELECT {COLUMNS} FROM {} ORDER BY name, id", self.table()),
			[],
		)
	}

	fn names(&self) -> Result<HashSet<String>> {
		let conn = self.connection()?;
		self.names_in(&conn)
	}

	fn filter_by_bounding_box(&self, bbox: &BoundingBox) -> Result<Vec<Feature>> {
		let conn = self.connection()?;
		let candidates = self.query_features(
			&conn,
			&format!(
				"SELECT {COLUMNS} FROM {} WHERE x_min <= ?3 AND x_max >= ?1 AND y_min <= ?4 AND y_max >= ?2 ORDER BY name, id",
				self.table()
			),
			params![bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
		)?;
		Ok(
			candidates
				.into_iter()
				.filter(|feature| feature.geometry.intersects_bbox(bbox))
				.collect(),
		)
	}

	fn create(&self, feature: NewFeature) -> Result<Feature> {
		let feature = feature.prepare(self.kind)?;
		let mut conn = self.connection()?;
		let transaction = conn
			.transaction_with_behavior(TransactionBehavior::Immediate)
			.map_err(FeatureError::storage)?;
		if self.find(&transaction, &feature.name)?.is_some() {
			return Err(FeatureError::DuplicateName(feature.name));
		}
		let feature = self.insert(&transaction, feature)?;
		transaction.commit().map_err(FeatureError::storage)?;
		log::debug!("created {} '{}' with id {}", self.kind, feature.name, feature.id);
		Ok(feature)
	}

	fn bulk_create(&self, features: Vec<NewFeature>) -> Result<BulkInsert> {
		let features = features
			.into_iter()
			.map(|feature| feature.prepare(self.kind))
			.collect::<Result<Vec<_>>>()?;
		if features.is_empty() {
			return Ok(BulkInsert::default());
		}

		let mut conn = self.connection()?;
		let transaction = conn
			.transaction_with_behavior(TransactionBehavior::Immediate)
			.map_err(FeatureError::storage)?;

		let mut result = BulkInsert::default();
		let mut taken = self.names_in(&transaction)?;
		for feature in features {
			if taken.contains(&feature.name) {
				result.rejected.push(feature.name);
				continue;
			}
			taken.insert(feature.name.clone());
			result.accepted.push(self.insert(&transaction, feature)?);
		}

		// dropping the transaction on an error above rolls everything back
		transaction.commit().map_err(FeatureError::storage)?;
		log::debug!(
			"bulk created {} {} features, skipped {}",
			result.accepted_count(),
			self.kind,
			result.rejected_count()
		);
		Ok(result)
	}

	fn update(&self, name: &str, patch: FeaturePatch) -> Result<Feature> {
		let mut conn = self.connection()?;
		let transaction = conn
			.transaction_with_behavior(TransactionBehavior::Immediate)
			.map_err(FeatureError::storage)?;

		let current = self
			.find(&transaction, name)?
			.ok_or_else(|| FeatureError::NotFound(name.to_string()))?;
		let updated = patch.apply_to(&current)?;
		if updated.name != current.name && self.find(&transaction, &updated.name)?.is_some() {
			return Err(FeatureError::DuplicateName(updated.name));
		}

		let bbox = updated.bounding_box();
		transaction
			.execute(
				&format!(
					"UPDATE {} SET name = ?1, geometry = ?2, x_min = ?3, y_min = ?4, x_max = ?5, y_max = ?6 WHERE id = ?7",
					self.table()
				),
				params![
					updated.name,
					updated.geometry.to_json().to_string(),
					bbox.x_min,
					bbox.y_min,
					bbox.x_max,
					bbox.y_max,
					updated.id as i64
				],
			)
			.map_err(|e| map_write_error(e, &updated.name))?;
		transaction.commit().map_err(FeatureError::storage)?;
		log::debug!("updated {} '{}' (id {})", self.kind, updated.name, updated.id);
		Ok(updated)
	}

	fn delete(&self, name: &str) -> Result<()> {
		let changed = self
			.connection()?
			.execute(&format!("DELETE FROM {} WHERE name = ?1", self.table()), params![name])
			.map_err(FeatureError::storage)?;
		if changed == 0 {
			return Err(FeatureError::NotFound(name.to_string()));
		}
		log::debug!("deleted {} '{name}'", self.kind);
		Ok(())
	}

	fn count(&self) -> Result<usize> {
		let count: i64 = self
			.connection()?
			.query_row(&format!("SELECT COUNT(*) FROM {}", self.table()), [], |row| row.get(0))
			.map_err(FeatureError::storage)?;
		Ok(count as usize)
	}
}

impl SqliteRepository {
	fn names_in(&self, conn: &Connection) -> Result<HashSet<String>> {
		let mut statement = conn
			.prepare(&format!("SELECT name FROM {}", self.table()))
			.map_err(FeatureError::storage)?;
		statement
			.query_map([], |row| row.get(0))
			.map_err(FeatureError::storage)?
			.collect::<rusqlite::Result<HashSet<String>>>()
			.map_err(FeatureError::storage)
	}
}
