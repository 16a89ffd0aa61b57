use super::{
	cors,
	handlers::{self, AppState},
	routes,
};
use crate::config::{Config, CorsConfig, PaginationConfig};
use anyhow::{Context, Result};
use axum::{
	Router,
	http::{HeaderName, HeaderValue},
	routing::get,
};
use geostore_core::FeatureStore;
use std::{collections::HashMap, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::set_header::SetResponseHeaderLayer;

/// Serves a [`FeatureStore`] over HTTP.
///
/// Starting a running server restarts it; stopping a stopped server does nothing.
pub struct FeatureServer {
	ip: String,
	port: u16,
	store: FeatureStore,
	cors: CorsConfig,
	pagination: PaginationConfig,
	extra_response_headers: HashMap<String, String>,
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
}

impl FeatureServer {
	/// Takes network, CORS, pagination and header settings from `config`.
	/// The storage section is ignored; see [`FeatureServer::from_config`].
	#[must_use]
	pub fn new(config: &Config, store: FeatureStore) -> FeatureServer {
		FeatureServer {
			ip: config.server.ip_or_default().to_string(),
			port: config.server.port_or_default(),
			store,
			cors: config.cors.clone(),
			pagination: config.pagination,
			extra_response_headers: config.extra_response_headers.clone(),
			exit_signal: None,
			join: None,
		}
	}

	/// Opens the configured storage backend and builds a server on top of it.
	pub fn from_config(config: &Config) -> Result<FeatureServer> {
		let store = config.storage.open()?;
		Ok(FeatureServer::new(config, store))
	}

	/// The bound port once started; the configured one before.
	#[must_use]
	pub fn port(&self) -> u16 {
		self.port
	}

	#[must_use]
	pub fn store(&self) -> &FeatureStore {
		&self.store
	}

	/// The complete application: `/status`, the feature API and all layers.
	pub fn router(&self) -> Result<Router> {
		let state = AppState {
			store: self.store.clone(),
			pagination: self.pagination,
		};

		let mut router = Router::new()
			.route("/status", get(|| async { "ready!" }))
			.merge(routes::feature_routes(state))
			.fallback(handlers::no_route)
			.layer(cors::build_cors_layer(&self.cors)?);

		for (name, value) in &self.extra_response_headers {
			let name = HeaderName::from_bytes(name.as_bytes()).with_context(|| format!("invalid header name {name:?}"))?;
			let value =
				HeaderValue::from_str(value).with_context(|| format!("invalid value {value:?} for header {name}"))?;
			router = router.layer(SetResponseHeaderLayer::overriding(name, value));
		}

		Ok(router)
	}

	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");
		let router = self.router()?;

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding to {addr}"))?;
		self.port = listener.local_addr()?.port();
		log::info!("server listening on {}:{}", self.ip, self.port);

		let (tx, rx) = oneshot::channel::<()>();
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);
		Ok(())
	}

	/// Signals a graceful shutdown and waits up to ten seconds for it.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Ok(())) => {}
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Err(_) => log::warn!("server task did not shut down within timeout"),
			}
		}
	}
}
