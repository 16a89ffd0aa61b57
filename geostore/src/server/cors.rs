//! Builds the CORS layer from [`CorsConfig`].
//!
//! Origin patterns:
//! - `"*"` allows every origin
//! - `"*.example.com"` matches by suffix
//! - `"https://dev-*"` matches by prefix
//! - `"/^https://(foo|bar)\.example\.com$/"` is a regular expression
//! - anything else must match exactly

use crate::config::CorsConfig;
use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, Method, header, request::Parts};
use regex::Regex;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug)]
enum OriginPattern {
	Any,
	Suffix(String),
	Prefix(String),
	Regex(Regex),
	Exact(String),
}

impl OriginPattern {
	fn parse(pattern: &str) -> Result<OriginPattern> {
		Ok(if pattern == "*" {
			OriginPattern::Any
		} else if let Some(expression) = pattern.strip_prefix('/').and_then(|p| p.strip_suffix('/'))
			&& !expression.is_empty()
		{
			OriginPattern::Regex(Regex::new(expression).with_context(|| format!("invalid origin regex {pattern:?}"))?)
		} else if let Some(suffix) = pattern.strip_prefix('*')
			&& !suffix.is_empty()
			&& !suffix.contains('*')
		{
			OriginPattern::Suffix(suffix.to_string())
		} else if let Some(prefix) = pattern.strip_suffix('*')
			&& !prefix.is_empty()
			&& !prefix.contains('*')
		{
			OriginPattern::Prefix(prefix.to_string())
		} else if pattern.contains('*') {
			bail!("unsupported origin pattern {pattern:?}: '*' is only allowed at the start or the end");
		} else {
			OriginPattern::Exact(pattern.to_string())
		})
	}

	fn matches(&self, origin: &str) -> bool {
		match self {
			OriginPattern::Any => true,
			OriginPattern::Suffix(suffix) => origin.ends_with(suffix.as_str()),
			OriginPattern::Prefix(prefix) => origin.starts_with(prefix.as_str()),
			OriginPattern::Regex(regex) => regex.is_match(origin),
			OriginPattern::Exact(exact) => origin == exact,
		}
	}
}

pub fn build_cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
	let patterns = config
		.allowed_origins
		.iter()
		.map(|pattern| OriginPattern::parse(pattern))
		.collect::<Result<Vec<_>>>()?;

	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _: &Parts| {
			origin
				.to_str()
				.is_ok_and(|origin| patterns.iter().any(|pattern| pattern.matches(origin)))
		}))
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE])
		.max_age(Duration::from_secs(config.max_age_seconds_or_default())))
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, body::Body, http::Request, routing::get};
	use rstest::rstest;
	use tower::ServiceExt;

	fn config(origins: &[&str]) -> CorsConfig {
		CorsConfig {
			allowed_origins: origins.iter().map(ToString::to_string).collect(),
			max_age_seconds: Some(3600),
		}
	}

	async fn allows(layer: &CorsLayer, origin: &str) -> bool {
		let app = Router::new().route("/", get(|| async { "ok" })).layer(layer.clone());
		let request = Request::builder()
			.uri("/")
			.header(header::ORIGIN, origin)
			.body(Body::empty())
			.unwrap();
		let response = app.oneshot(request).await.unwrap();
		response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_some()
	}

	#[rstest]
	#[case(&["*"], "http://anything.local", true)]
	#[case(&["https://maps.example.org"], "https://maps.example.org", true)]
	#[case(&["https://maps.example.org"], "https://maps.example.com", false)]
	#[case(&["*.example.com"], "https://foo.example.com", true)]
	#[case(&["*.example.com"], "https://example.org", false)]
	#[case(&["https://dev-*"], "https://dev-01.example.com", true)]
	#[case(&["https://dev-*"], "https://prod-01.example.com", false)]
	#[case(&["/^https://(foo|bar)\\.example\\.com$/"], "https://bar.example.com", true)]
	#[case(&["/^https://(foo|bar)\\.example\\.com$/"], "https://baz.example.com", false)]
	#[case(&["https://a.org", "*.b.org"], "https://x.b.org", true)]
	#[case(&[], "https://a.org", false)]
	#[tokio::test]
	async fn origin_patterns(#[case] origins: &[&str], #[case] origin: &str, #[case] expected: bool) {
		let layer = build_cors_layer(&config(origins)).unwrap();
		assert_eq!(allows(&layer, origin).await, expected);
	}

	#[rstest]
	#[case("/[unclosed/")]
	#[case("https://*.example.*")]
	#[case("a*b")]
	fn invalid_patterns(#[case] pattern: &str) {
		assert!(build_cors_layer(&config(&[pattern])).is_err());
	}

	#[tokio::test]
	async fn preflight_allows_writes() {
		let layer = build_cors_layer(&config(&["*"])).unwrap();
		let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);
		let request = Request::builder()
			.method(Method::OPTIONS)
			.uri("/")
			.header(header::ORIGIN, "https://example.org")
			.header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
			.body(Body::empty())
			.unwrap();
		let response = app.oneshot(request).await.unwrap();
		let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
		assert!(methods.contains("PUT"), "{methods}");
		assert_eq!(response.headers()[header::ACCESS_CONTROL_MAX_AGE], "3600");
	}
}
