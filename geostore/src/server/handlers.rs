//! Request handlers of the feature API.
//!
//! Repository calls are synchronous and may hit the disk, so every one of them
//! runs on tokio's blocking pool.

use super::pagination::{ListParams, Page, parse_page_param};
use crate::config::PaginationConfig;
use axum::{
	Json,
	body::Bytes,
	extract::{Path, Query, State},
	http::{StatusCode, Uri},
	response::{IntoResponse, Response},
};
use geostore_core::{
	ErrorKind, FeatureError, FeatureKind, FeaturePatch, FeatureStore,
	error::Result as FeatureResult,
	ingest::{IngestReport, candidates_from_feature_collection, ingest},
	query::query_bounding_box,
};
use serde_json::{Value, json};
use std::fmt;

#[derive(Debug, Clone)]
pub struct AppState {
	pub store: FeatureStore,
	pub pagination: PaginationConfig,
}

/// Everything a handler can answer with instead of a success.
#[derive(Debug)]
pub enum ApiError {
	Feature(FeatureError),
	UnknownKind(String),
	InvalidParameter(String),
	PageOutOfRange(usize),
	NoRoute(String),
}

impl ApiError {
	fn status(&self) -> StatusCode {
		match self {
			ApiError::Feature(error) => match error.kind() {
				ErrorKind::NotFound => StatusCode::NOT_FOUND,
				ErrorKind::DuplicateName => StatusCode::CONFLICT,
				ErrorKind::StorageFault => StatusCode::INTERNAL_SERVER_ERROR,
				ErrorKind::InvalidGeometry
				| ErrorKind::InvalidBoundingBox
				| ErrorKind::MissingGeometry
				| ErrorKind::EmptyName
				| ErrorKind::InvalidPayload => StatusCode::BAD_REQUEST,
			},
			ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
			ApiError::UnknownKind(_) | ApiError::PageOutOfRange(_) | ApiError::NoRoute(_) => StatusCode::NOT_FOUND,
		}
	}

	fn kind(&self) -> ErrorKind {
		match self {
			ApiError::Feature(error) => error.kind(),
			ApiError::InvalidParameter(_) => ErrorKind::InvalidPayload,
			ApiError::UnknownKind(_) | ApiError::PageOutOfRange(_) | ApiError::NoRoute(_) => ErrorKind::NotFound,
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::Feature(error) => write!(f, "{error}"),
			ApiError::UnknownKind(kind) => write!(f, "unknown feature kind '{kind}'"),
			ApiError::InvalidParameter(message) => f.write_str(message),
			ApiError::PageOutOfRange(page) => write!(f, "invalid page {page}"),
			ApiError::NoRoute(path) => write!(f, "nothing found at '{path}'"),
		}
	}
}

impl From<FeatureError> for ApiError {
	fn from(error: FeatureError) -> Self {
		ApiError::Feature(error)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			log::error!("{status}: {self}");
		} else {
			log::warn!("{status}: {self}");
		}
		let body = json!({ "error": self.to_string(), "kind": self.kind().as_str() });
		(status, Json(body)).into_response()
	}
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_kind(raw: &str) -> ApiResult<FeatureKind> {
	raw.parse().map_err(|_| ApiError::UnknownKind(raw.to_string()))
}

fn parse_body(body: &Bytes) -> ApiResult<Value> {
	serde_json::from_slice(body).map_err(|error| FeatureError::InvalidPayload(format!("body is not valid JSON: {error}")).into())
}

async fn blocking<T, F>(task: F) -> ApiResult<T>
where
	F: FnOnce() -> FeatureResult<T> + Send + 'static,
	T: Send + 'static,
{
	match tokio::task::spawn_blocking(task).await {
		Ok(result) => result.map_err(ApiError::from),
		Err(error) => Err(FeatureError::StorageFault(format!("repository task failed: {error}")).into()),
	}
}

/// `GET /api/features/{kind}/`
pub async fn list_features(
	State(state): State<AppState>,
	Path(kind): Path<String>,
	Query(params): Query<ListParams>,
	uri: Uri,
) -> ApiResult<Json<Value>> {
	let kind = parse_kind(&kind)?;
	let page = parse_page_param("page", params.page.as_deref())?.unwrap_or(1);
	let page_size = state
		.pagination
		.clamp(parse_page_param("page_size", params.page_size.as_deref())?);
	log::debug!("list {kind}: page {page}, page size {page_size}, bbox {:?}", params.in_bbox);

	let repository = state.store.repository(kind).clone();
	let in_bbox = params.in_bbox.clone();
	let features = blocking(move || match in_bbox {
		Some(raw) => query_bounding_box(&*repository, &raw),
		None => repository.list_all(),
	})
	.await?;

	let page = Page::new(features, page, page_size)?;
	Ok(Json(page.to_json(uri.path(), &params)))
}

/// `GET /api/features/{kind}/{name}/`
pub async fn get_feature(
	State(state): State<AppState>,
	Path((kind, name)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
	let kind = parse_kind(&kind)?;
	log::debug!("get {kind} '{name}'");
	let repository = state.store.repository(kind).clone();
	let feature = blocking(move || repository.get_by_name(&name)).await?;
	Ok(Json(feature.to_geojson()))
}

/// `POST /api/features/{kind}/` with a GeoJSON FeatureCollection.
pub async fn create_features(
	State(state): State<AppState>,
	Path(kind): Path<String>,
	body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
	let kind = parse_kind(&kind)?;
	let candidates = candidates_from_feature_collection(&parse_body(&body)?)?;
	log::debug!("ingest {} {kind} candidates", candidates.len());
	let repository = state.store.repository(kind).clone();
	let report = blocking(move || ingest(&*repository, candidates)).await?;
	Ok((StatusCode::CREATED, Json(report_to_json(&report))))
}

fn report_to_json(report: &IngestReport) -> Value {
	json!({
		"accepted_count": report.accepted_count(),
		"accepted": report.accepted.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
		"rejections": report
			.rejections
			.iter()
			.map(|r| json!({
				"index": r.index,
				"name": r.name,
				"reason": r.kind().as_str(),
				"message": r.reason.to_string(),
			}))
			.collect::<Vec<_>>(),
	})
}

/// `PUT /api/features/{kind}/{name}/` with a (partial) GeoJSON Feature.
pub async fn update_feature(
	State(state): State<AppState>,
	Path((kind, name)): Path<(String, String)>,
	body: Bytes,
) -> ApiResult<Json<Value>> {
	let kind = parse_kind(&kind)?;
	let patch = FeaturePatch::from_geojson_feature(&parse_body(&body)?)?;
	log::debug!("update {kind} '{name}'");
	let repository = state.store.repository(kind).clone();
	let feature = blocking(move || repository.update(&name, patch)).await?;
	Ok(Json(feature.to_geojson()))
}

/// `DELETE /api/features/{kind}/{name}/`
pub async fn delete_feature(
	State(state): State<AppState>,
	Path((kind, name)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
	let kind = parse_kind(&kind)?;
	log::debug!("delete {kind} '{name}'");
	let repository = state.store.repository(kind).clone();
	blocking(move || repository.delete(&name)).await?;
	Ok(StatusCode::NO_CONTENT)
}

pub async fn no_route(uri: Uri) -> ApiError {
	ApiError::NoRoute(uri.path().to_string())
}
