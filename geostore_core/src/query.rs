//! Bounding-box queries.
//!
//! A query box is written as `minX,minY,maxX,maxY` (longitude/latitude in WGS84),
//! e.g. `?in_bbox=6.5,53.0,7.0,53.5`.

use crate::{error::Result, feature::Feature, repository::FeatureRepository};
use geostore_geometry::BoundingBox;

/// Parses `minX,minY,maxX,maxY`.
///
/// Exactly four numeric tokens are required; whitespace around a token is ignored.
/// Fails with `InvalidBoundingBox` on a wrong token count, a non-numeric or
/// non-finite token, or a minimum greater than its maximum.
pub fn parse_bounding_box(raw: &str) -> Result<BoundingBox> {
	Ok(raw.parse::<BoundingBox>()?)
}

/// All features of `repository` intersecting the box described by `raw`, ascending by name.
pub fn query_bounding_box(repository: &dyn FeatureRepository, raw: &str) -> Result<Vec<Feature>> {
	let bbox = parse_bounding_box(raw)?;
	log::debug!("querying {} features in {bbox}", repository.kind());
	repository.filter_by_bounding_box(&bbox)
}
