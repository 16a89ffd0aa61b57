//! Intersection tests for polygonal geometry.
//!
//! Two polygons intersect if their boundaries touch or cross, or if one lies
//! completely inside the other. Boundary contact is found with an exact
//! orientation-based segment test; containment is decided by a point-in-polygon
//! test once it is known that the boundaries do not meet.

use crate::{BoundingBox, CompositeGeometryTrait, Coordinates, GeometryTrait, PolygonGeometry, RingGeometry};

/// Twice the signed area of the triangle `a, b, c`.
/// Positive if `c` lies left of the line `a → b`, zero if collinear.
fn orientation(a: Coordinates, b: Coordinates, c: Coordinates) -> f64 {
	(b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())
}

/// Whether `p`, known to be collinear with `a → b`, lies on that segment.
fn on_segment(a: Coordinates, b: Coordinates, p: Coordinates) -> bool {
	p.x() >= a.x().min(b.x()) && p.x() <= a.x().max(b.x()) && p.y() >= a.y().min(b.y()) && p.y() <= a.y().max(b.y())
}

/// True if the closed segments `p1 → p2` and `q1 → q2` share at least one point.
#[must_use]
pub fn segments_intersect(p1: Coordinates, p2: Coordinates, q1: Coordinates, q2: Coordinates) -> bool {
	let d1 = orientation(q1, q2, p1);
	let d2 = orientation(q1, q2, p2);
	let d3 = orientation(p1, p2, q1);
	let d4 = orientation(p1, p2, q2);

	if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)) && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0)) {
		return true;
	}

	(d1 == 0.0 && on_segment(q1, q2, p1))
		|| (d2 == 0.0 && on_segment(q1, q2, p2))
		|| (d3 == 0.0 && on_segment(p1, p2, q1))
		|| (d4 == 0.0 && on_segment(p1, p2, q2))
}

fn segment_bounds(a: Coordinates, b: Coordinates) -> BoundingBox {
	BoundingBox {
		x_min: a.x().min(b.x()),
		y_min: a.y().min(b.y()),
		x_max: a.x().max(b.x()),
		y_max: a.y().max(b.y()),
	}
}

/// True if any edge of ring `a` touches or crosses any edge of ring `b`.
#[must_use]
pub fn rings_touch(a: &RingGeometry, b: &RingGeometry) -> bool {
	let (Some(bounds_a), Some(bounds_b)) = (a.compute_bounds(), b.compute_bounds()) else {
		return false;
	};
	if !bounds_a.intersects_bbox(&bounds_b) {
		return false;
	}

	let edges_b: Vec<(Coordinates, Coordinates, BoundingBox)> = b
		.edges()
		.map(|(q1, q2)| (q1, q2, segment_bounds(q1, q2)))
		.filter(|(_, _, bounds)| bounds.intersects_bbox(&bounds_a))
		.collect();

	a.edges().any(|(p1, p2)| {
		let bounds_p = segment_bounds(p1, p2);
		edges_b
			.iter()
			.any(|(q1, q2, bounds_q)| bounds_p.intersects_bbox(bounds_q) && segments_intersect(p1, p2, *q1, *q2))
	})
}

/// Standard polygon intersection: boundaries meet, or one polygon contains the other.
/// Holes are respected, so a polygon sitting entirely inside a hole of another does not intersect it.
#[must_use]
pub fn polygons_intersect(a: &PolygonGeometry, b: &PolygonGeometry) -> bool {
	let (Some(bounds_a), Some(bounds_b)) = (a.compute_bounds(), b.compute_bounds()) else {
		return false;
	};
	if !bounds_a.intersects_bbox(&bounds_b) {
		return false;
	}

	if a.iter().any(|ring_a| b.iter().any(|ring_b| rings_touch(ring_a, ring_b))) {
		return true;
	}

	// Boundaries are disjoint: either one polygon lies inside the other, or they are apart.
	let vertex_inside = |inner: &PolygonGeometry, outer: &PolygonGeometry| {
		inner
			.exterior()
			.and_then(|ring| ring.first())
			.is_some_and(|p| outer.contains_point(p.x(), p.y()))
	};
	vertex_inside(a, b) || vertex_inside(b, a)
}
