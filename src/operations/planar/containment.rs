use crate::geometry::{Shape, DEFAULT_DIVISIONS};
use crate::math::distance_2d::cross_2d;
use crate::math::intersect_2d::loops_cross;
use crate::math::polygon_2d::point_in_polygon;
use crate::math::{Point2, TOLERANCE};

/// Clearance reported when a symbol is not inside the outline.
pub const NOT_CONTAINED: f64 = -1.0;

/// Returns `true` if every sampled point of every inner shape lies strictly
/// inside the convex, clockwise `outer` boundary. Touching an edge does not
/// count.
#[must_use]
pub fn contained(outer: &Shape, inners: &[Shape]) -> bool {
    clearance(outer, inners) > 0.0
}

/// Minimum distance from any inner shape's boundary to any edge line of `outer`.
///
/// Returns [`NOT_CONTAINED`] as soon as a point is found on the outside of an
/// edge, and `f64::INFINITY` when there are no inner points at all.
#[must_use]
pub fn clearance(outer: &Shape, inners: &[Shape]) -> f64 {
    let inner_points: Vec<Point2> = inners
        .iter()
        .flat_map(|s| s.points(DEFAULT_DIVISIONS))
        .collect();
    clearance_of_points(&outer.points(DEFAULT_DIVISIONS), &inner_points)
}

/// [`clearance`] over already-sampled boundaries.
#[must_use]
pub fn clearance_of_points(outer: &[Point2], inner: &[Point2]) -> f64 {
    let n = outer.len();
    let mut min = f64::INFINITY;
    for i in 0..n {
        let a = outer[i];
        let edge = outer[(i + 1) % n] - a;
        let len = edge.norm();
        if len < TOLERANCE {
            continue;
        }
        for p in inner {
            // Clockwise winding puts the interior on the negative side.
            let cross = cross_2d(&edge, &(p - a));
            if cross > 0.0 {
                return NOT_CONTAINED;
            }
            min = min.min(-cross / len);
        }
    }
    min
}

/// Returns `true` if `inner` sits inside `outer`: no edges cross and at least
/// one vertex of `inner` is inside `outer`.
#[must_use]
pub fn polygon_contains_polygon(outer: &[Point2], inner: &[Point2]) -> bool {
    !loops_cross(outer, inner) && inner.iter().any(|p| point_in_polygon(p, outer))
}
