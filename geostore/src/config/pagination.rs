use anyhow::{Result, ensure};
use serde::Deserialize;

/// Page sizes of list responses.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
	/// Used when a request has no `page_size` parameter.
	#[serde(default = "default_page_size")]
	pub page_size: usize,

	/// Upper limit for the `page_size` parameter; larger values are clamped.
	#[serde(default = "default_max_page_size")]
	pub max_page_size: usize,
}

fn default_page_size() -> usize {
	10
}

fn default_max_page_size() -> usize {
	1000
}

impl PaginationConfig {
	pub fn check(&self) -> Result<()> {
		ensure!(self.page_size > 0, "pagination.page_size must be at least 1");
		ensure!(
			self.max_page_size >= self.page_size,
			"pagination.max_page_size ({}) must not be smaller than pagination.page_size ({})",
			self.max_page_size,
			self.page_size
		);
		Ok(())
	}

	/// The effective page size for a requested one.
	#[must_use]
	pub fn clamp(&self, requested: Option<usize>) -> usize {
		requested.unwrap_or(self.page_size).min(self.max_page_size)
	}
}

impl Default for PaginationConfig {
	fn default() -> Self {
		Self {
			page_size: default_page_size(),
			max_page_size: default_max_page_size(),
		}
	}
}
