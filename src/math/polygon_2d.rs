use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` when the polygon winds clockwise.
#[must_use]
pub fn is_clockwise(points: &[Point2]) -> bool {
    signed_area(points) < 0.0
}

/// Arithmetic mean of a set of points.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    if points.is_empty() {
        return Point2::origin();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Ray-crossing point-in-polygon test (even-odd rule).
///
/// Points exactly on the boundary may be classified either way.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Convex hull of a point set, counter-clockwise, with collinear points removed.
///
/// Uses the monotone chain algorithm. Points closer than `tolerance` to the
/// hull edge they would extend are treated as collinear.
#[must_use]
pub fn convex_hull(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| (*a - *b).norm() < tolerance);
    if sorted.len() < 3 {
        return sorted;
    }

    let turn = |o: &Point2, a: &Point2, b: &Point2| -> f64 {
        let (oa, ob) = (a - o, b - o);
        let len = oa.norm().max(ob.norm()).max(TOLERANCE);
        (oa.x * ob.y - oa.y * ob.x) / len
    };

    let mut lower: Vec<Point2> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && turn(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= tolerance {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point2> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && turn(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= tolerance {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
