//! Configuration of the GeoStore server.
//!
//! Usually loaded from a YAML file (`geostore.yml`) and refined by command line flags:
//! - [`Config`]: top-level loader
//! - [`ServerConfig`]: network settings
//! - [`CorsConfig`]: CORS policy
//! - [`StorageConfig`]: where features are kept
//! - [`PaginationConfig`]: page sizes of list responses

mod cors;
mod main;
mod pagination;
mod server;
mod storage;

pub use cors::CorsConfig;
pub use main::Config;
pub use pagination::PaginationConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
