//! # GeoStore
//!
//! A feature store for named polygonal features (Dutch municipalities and parks)
//! served over HTTP.
//!
//! - [`config`]: the YAML configuration of the server
//! - [`server`]: the axum application and its lifecycle
//!
//! The feature model, the repositories, bulk ingest and bounding-box queries
//! live in `geostore_core`; the geometry in `geostore_geometry`.
//!
//! ```no_run
//! use geostore::{Config, FeatureServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_string("server:\n  port: 8080\n")?;
//!     let mut server = FeatureServer::from_config(&config)?;
//!     server.start().await?;
//!     server.stop().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod server;

pub use config::Config;
pub use server::FeatureServer;
