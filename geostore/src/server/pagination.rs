//! Page-number pagination of list responses.
//!
//! ```json
//! { "count": 42, "page": 2, "page_size": 10, "next": "...?page=3", "previous": "...?page=1",
//!   "results": { "type": "FeatureCollection", "features": [...] } }
//! ```

use super::handlers::ApiError;
use geostore_core::Feature;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt::Write;

/// Query parameters of the list endpoint.
///
/// Kept as strings so that malformed numbers produce our own error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
	pub in_bbox: Option<String>,
	pub page: Option<String>,
	pub page_size: Option<String>,
}

/// Parses a positive integer query parameter.
pub fn parse_page_param(name: &str, raw: Option<&str>) -> Result<Option<usize>, ApiError> {
	let Some(raw) = raw else {
		return Ok(None);
	};
	match raw.trim().parse::<usize>() {
		Ok(value) if value > 0 => Ok(Some(value)),
		_ => Err(ApiError::InvalidParameter(format!(
			"'{name}' must be a positive integer, got '{raw}'"
		))),
	}
}

#[derive(Debug)]
pub struct Page {
	number: usize,
	size: usize,
	count: usize,
	items: Vec<Feature>,
}

impl Page {
	/// Cuts page `number` (1-based) out of `all`.
	///
	/// The first page always exists, even when `all` is empty.
	pub fn new(all: Vec<Feature>, number: usize, size: usize) -> Result<Page, ApiError> {
		let count = all.len();
		let start = number.saturating_sub(1).saturating_mul(size);
		if number > 1 && start >= count {
			return Err(ApiError::PageOutOfRange(number));
		}
		let items = all.into_iter().skip(start).take(size).collect();
		Ok(Page {
			number,
			size,
			count,
			items,
		})
	}

	fn has_next(&self) -> bool {
		self.number.saturating_mul(self.size) < self.count
	}

	pub fn to_json(&self, path: &str, params: &ListParams) -> Value {
		let link = |number: usize| page_link(path, params.in_bbox.as_deref(), number, self.size);
		json!({
			"count": self.count,
			"page": self.number,
			"page_size": self.size,
			"next": self.has_next().then(|| link(self.number + 1)),
			"previous": (self.number > 1).then(|| link(self.number - 1)),
			"results": {
				"type": "FeatureCollection",
				"features": self.items.iter().map(Feature::to_geojson).collect::<Vec<_>>(),
			},
		})
	}
}

/// Characters left as-is in a query value; commas keep bounding boxes readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~')
	.remove(b',');

fn page_link(path: &str, in_bbox: Option<&str>, page: usize, page_size: usize) -> String {
	let mut link = format!("{path}?");
	if let Some(in_bbox) = in_bbox {
		let _ = write!(link, "in_bbox={}&", utf8_percent_encode(in_bbox, QUERY_VALUE));
	}
	let _ = write!(link, "page={page}&page_size={page_size}");
	link
}

#[cfg(test)]
mod tests {
	use super::*;
	use geostore_core::{FeatureKind, Geometry};
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn features(count: usize) -> Vec<Feature> {
		let geometry =
			Geometry::parse(&json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]})).unwrap();
		(0..count)
			.map(|i| Feature {
				id: u64::try_from(i).unwrap() + 1,
				kind: FeatureKind::Park,
				name: format!("park {i:02}"),
				geometry: geometry.clone(),
			})
			.collect()
	}

	#[rstest]
	#[case(None, Ok(None))]
	#[case(Some("3"), Ok(Some(3)))]
	#[case(Some(" 7 "), Ok(Some(7)))]
	#[case(Some("0"), Err(()))]
	#[case(Some("-1"), Err(()))]
	#[case(Some("two"), Err(()))]
	fn parse_param(#[case] raw: Option<&str>, #[case] expected: Result<Option<usize>, ()>) {
		assert_eq!(parse_page_param("page", raw).map_err(|_| ()), expected);
	}

	#[rstest]
	#[case(25, 1, 10, 10, true, false)]
	#[case(25, 2, 10, 10, true, true)]
	#[case(25, 3, 10, 5, false, true)]
	#[case(20, 2, 10, 10, false, true)]
	#[case(0, 1, 10, 0, false, false)]
	fn pages(
		#[case] total: usize,
		#[case] number: usize,
		#[case] size: usize,
		#[case] expected_items: usize,
		#[case] has_next: bool,
		#[case] has_previous: bool,
	) {
		let page = Page::new(features(total), number, size).unwrap();
		let json = page.to_json("/api/features/park/", &ListParams::default());
		assert_eq!(json["count"], total);
		assert_eq!(json["results"]["features"].as_array().unwrap().len(), expected_items);
		assert_eq!(!json["next"].is_null(), has_next);
		assert_eq!(!json["previous"].is_null(), has_previous);
	}

	#[rstest]
	#[case(25, 4, 10)]
	#[case(0, 2, 10)]
	#[case(10, 2, 10)]
	fn out_of_range(#[case] total: usize, #[case] number: usize, #[case] size: usize) {
		assert!(matches!(
			Page::new(features(total), number, size),
			Err(ApiError::PageOutOfRange(n)) if n == number
		));
	}

	#[test]
	fn links_keep_the_bounding_box() {
		let params = ListParams {
			in_bbox: Some("0, 0,50,50".to_string()),
			..ListParams::default()
		};
		let json = Page::new(features(30), 2, 10).unwrap().to_json("/api/features/park/", &params);
		assert_eq!(
			json["next"],
			"/api/features/park/?in_bbox=0,%200,50,50&page=3&page_size=10"
		);
		assert_eq!(
			json["previous"],
			"/api/features/park/?in_bbox=0,%200,50,50&page=1&page_size=10"
		);
	}

	#[rstest]
	#[case("6.5,53.0,7.0,53.5", "6.5,53.0,7.0,53.5")]
	#[case("1&page=9", "1%26page%3D9")]
	#[case("1+2#3", "1%2B2%233")]
	#[case("ä", "%C3%A4")]
	fn links_encode_the_bounding_box(#[case] in_bbox: &str, #[case] encoded: &str) {
		let params = ListParams {
			in_bbox: Some(in_bbox.to_string()),
			..ListParams::default()
		};
		let json = Page::new(features(30), 1, 10).unwrap().to_json("/p", &params);
		assert_eq!(json["next"], format!("/p?in_bbox={encoded}&page=2&page_size=10"));
	}

	#[test]
	fn results_keep_order() {
		let json = Page::new(features(12), 2, 5).unwrap().to_json("/", &ListParams::default());
		let names: Vec<&str> = json["results"]["features"]
			.as_array()
			.unwrap()
			.iter()
			.map(|f| f["properties"]["name"].as_str().unwrap())
			.collect();
		assert_eq!(names, ["park 05", "park 06", "park 07", "park 08", "park 09"]);
	}
}
