use super::distance_2d::cross_2d;
use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(d1, d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dp = p2 - p1;
    let t = cross_2d(&dp, d2) / cross;
    let u = cross_2d(&dp, d1) / cross;
    Some((t, u))
}

/// Returns `true` when segments `a0`–`a1` and `b0`–`b1` cross.
///
/// Touching at an endpoint counts as a crossing; parallel segments never cross.
#[must_use]
pub fn segments_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let Some((t, u)) = line_line_intersect_2d(a0, &(a1 - a0), b0, &(b1 - b0)) else {
        return false;
    };
    let eps = TOLERANCE;
    t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps
}

/// Returns `true` if any edge of closed loop `a` crosses any edge of closed loop `b`.
#[must_use]
pub fn loops_cross(a: &[Point2], b: &[Point2]) -> bool {
    let (na, nb) = (a.len(), b.len());
    for i in 0..na {
        let (a0, a1) = (&a[i], &a[(i + 1) % na]);
        for j in 0..nb {
            if segments_cross(a0, a1, &b[j], &b[(j + 1) % nb]) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_lines() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.5, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        assert!(line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(2.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn crossing_and_disjoint_segments() {
        let o = Point2::new(0.0, 0.0);
        assert!(segments_cross(&o, &Point2::new(2.0, 2.0), &Point2::new(0.0, 2.0), &Point2::new(2.0, 0.0)));
        assert!(!segments_cross(&o, &Point2::new(1.0, 0.0), &Point2::new(2.0, -1.0), &Point2::new(2.0, 1.0)));
    }

    #[test]
    fn nested_squares_do_not_cross() {
        let outer = [
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ];
        let inner = [
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ];
        assert!(!loops_cross(&outer, &inner));
        let shifted: Vec<_> = inner.iter().map(|p| p + Vector2::new(1.5, 0.0)).collect();
        assert!(loops_cross(&outer, &shifted));
    }
}
