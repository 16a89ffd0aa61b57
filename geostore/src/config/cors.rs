//! Cross-Origin Resource Sharing (CORS) settings.
//!
//! ```yaml
//! cors:
//!   allowed_origins:
//!     - "https://example.org"
//!     - "*.example.net"
//!   max_age_seconds: 86400
//! ```
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
	/// Origins allowed to call the API. Defaults to `["*"]`.
	///
	/// An entry is either `*`, an exact origin, a glob with `*` at the start
	/// (`*.example.com`) or at the end (`https://example.*`), or a regular
	/// expression enclosed in slashes (`/example\.(org|net)$/`).
	#[serde(default = "default_allowed_origins")]
	pub allowed_origins: Vec<String>,

	/// How long browsers may cache preflight responses. Defaults to one day.
	#[serde(default)]
	pub max_age_seconds: Option<u64>,
}

fn default_allowed_origins() -> Vec<String> {
	vec!["*".to_string()]
}

impl CorsConfig {
	#[must_use]
	pub fn max_age_seconds_or_default(&self) -> u64 {
		self.max_age_seconds.unwrap_or(86400)
	}
}

impl Default for CorsConfig {
	fn default() -> Self {
		Self {
			allowed_origins: default_allowed_origins(),
			max_age_seconds: None,
		}
	}
}
