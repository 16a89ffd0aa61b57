use super::{CorsConfig, PaginationConfig, ServerConfig, StorageConfig};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	collections::HashMap,
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Cross-Origin Resource Sharing (CORS) settings
	#[serde(default)]
	pub cors: CorsConfig,

	/// Storage backend
	#[serde(default)]
	pub storage: StorageConfig,

	/// Page sizes of list responses
	#[serde(default)]
	pub pagination: PaginationConfig,

	/// Extra response headers added to every HTTP response,
	/// e.g. `Cache-Control: no-store`.
	#[serde(default)]
	pub extra_response_headers: HashMap<String, String>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_reader(reader)?;
		config.pagination.check()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_str(text)?;
		config.pagination.check()?;
		Ok(config)
	}

	/// Parses a file and resolves the storage path relative to it.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;
		if let Some(base) = path.parent() {
			config.storage.resolve_paths(base);
		}
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::StorageBackend;
	use pretty_assertions::assert_eq;
	use std::{io::Write, path::PathBuf};

	const EXAMPLE: &str = r#"
server:
  ip: 127.0.0.1
  port: 51234
cors:
  allowed_origins:
    - https://example.org
    - "*.other-example.org"
  max_age_seconds: 600
storage:
  backend: sqlite
  path: features.sqlite
pagination:
  page_size: 25
  max_page_size: 100
extra_response_headers:
  Cache-Control: no-store
"#;

	#[test]
	fn parse_example_config() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("geostore.yml");
		File::create(&path).unwrap().write_all(EXAMPLE.as_bytes()).unwrap();

		assert_eq!(
			Config::from_path(&path).unwrap(),
			Config {
				server: ServerConfig {
					ip: Some("127.0.0.1".to_string()),
					port: Some(51234),
				},
				cors: CorsConfig {
					allowed_origins: vec!["https://example.org".to_string(), "*.other-example.org".to_string()],
					max_age_seconds: Some(600),
				},
				storage: StorageConfig {
					backend: StorageBackend::Sqlite,
					path: Some(dir.path().join("features.sqlite")),
				},
				pagination: PaginationConfig {
					page_size: 25,
					max_page_size: 100,
				},
				extra_response_headers: HashMap::from([("Cache-Control".to_string(), "no-store".to_string())]),
			}
		);
	}

	#[test]
	fn parse_from_string_keeps_relative_path() {
		let config = Config::from_string(EXAMPLE).unwrap();
		assert_eq!(config.storage.path, Some(PathBuf::from("features.sqlite")));
	}

	#[test]
	fn parse_empty_config() {
		assert_eq!(Config::from_string("").unwrap(), Config::default());
	}

	#[test]
	fn parse_partial_config() {
		let config = Config::from_string("pagination:\n  page_size: 50\n").unwrap();
		assert_eq!(config.pagination.page_size, 50);
		assert_eq!(config.pagination.max_page_size, 1000);
		assert_eq!(config.cors, CorsConfig::default());
		assert_eq!(config.storage.backend, StorageBackend::Memory);
	}

	#[test]
	fn parse_invalid_config() {
		assert!(Config::from_string("server:\n  pi: 3.14.15.9").is_err());
		assert!(Config::from_string("storage:\n  backend: postgres").is_err());
		assert!(Config::from_string("unknown: true").is_err());
		assert!(Config::from_string("pagination:\n  page_size: 0").is_err());
	}

	#[test]
	fn missing_file() {
		let error = Config::from_path(Path::new("/does/not/exist.yml")).unwrap_err();
		assert!(format!("{error:#}").contains("opening config file"));
	}
}
