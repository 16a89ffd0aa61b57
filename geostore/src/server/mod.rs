//! HTTP server of the feature store.
//!
//! - `feature_server` owns the lifecycle: building the router, cross-cutting
//!   layers, listening and graceful shutdown
//! - `routes` and `handlers` implement the `/api/features/...` endpoints
//! - `pagination` pages list responses
//! - `cors` turns the configured origin patterns into a `CorsLayer`

mod cors;
mod feature_server;
mod handlers;
mod pagination;
mod routes;

pub use feature_server::*;
