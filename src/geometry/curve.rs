use std::f64::consts::TAU;

use crate::math::{Point2, Vector2, TOLERANCE};

/// An elliptical arc in the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseArc {
    /// Centre of the ellipse.
    pub center: Point2,
    /// Radius along the (unrotated) X axis.
    pub radius_x: f64,
    /// Radius along the (unrotated) Y axis.
    pub radius_y: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Sweep direction.
    pub clockwise: bool,
    /// Rotation of the ellipse axes about its centre.
    pub rotation: f64,
}

impl EllipseArc {
    /// A full circle starting at angle zero, swept counter-clockwise.
    #[must_use]
    pub fn circle(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius_x: radius,
            radius_y: radius,
            start_angle: 0.0,
            end_angle: TAU,
            clockwise: false,
            rotation: 0.0,
        }
    }

    fn point_at(&self, t: f64) -> Point2 {
        let mut delta = self.end_angle - self.start_angle;
        let same_points = delta.abs() < f64::EPSILON;

        while delta < 0.0 {
            delta += TAU;
        }
        while delta > TAU {
            delta -= TAU;
        }
        if delta < f64::EPSILON {
            delta = if same_points { 0.0 } else { TAU };
        }
        if self.clockwise && !same_points {
            delta = if (delta - TAU).abs() < f64::EPSILON {
                -TAU
            } else {
                delta - TAU
            };
        }

        let angle = self.start_angle + t * delta;
        let local = Vector2::new(self.radius_x * angle.cos(), self.radius_y * angle.sin());
        self.center + rotate_vector(&local, self.rotation)
    }
}

/// One piece of a closed outline.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Straight line.
    Line { from: Point2, to: Point2 },
    /// Quadratic Bézier curve.
    Quadratic {
        from: Point2,
        control: Point2,
        to: Point2,
    },
    /// Cubic Bézier curve.
    Cubic {
        from: Point2,
        control1: Point2,
        control2: Point2,
        to: Point2,
    },
    /// Elliptical arc.
    Arc(EllipseArc),
    /// Catmull-Rom spline through the given points.
    Spline { points: Vec<Point2> },
}

impl Segment {
    /// Number of intervals this segment is sampled with for a given `divisions`.
    #[must_use]
    pub fn resolution(&self, divisions: usize) -> usize {
        match self {
            Self::Line { .. } => 1,
            Self::Arc(_) => divisions * 2,
            Self::Spline { points } => divisions * points.len().max(1),
            Self::Quadratic { .. } | Self::Cubic { .. } => divisions,
        }
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line { from, to } => Point2::from(from.coords * (1.0 - t) + to.coords * t),
            Self::Quadratic { from, control, to } => {
                let k = 1.0 - t;
                Point2::from(
                    from.coords * (k * k) + control.coords * (2.0 * k * t) + to.coords * (t * t),
                )
            }
            Self::Cubic {
                from,
                control1,
                control2,
                to,
            } => {
                let k = 1.0 - t;
                Point2::from(
                    from.coords * (k * k * k)
                        + control1.coords * (3.0 * k * k * t)
                        + control2.coords * (3.0 * k * t * t)
                        + to.coords * (t * t * t),
                )
            }
            Self::Arc(arc) => arc.point_at(t),
            Self::Spline { points } => spline_point(points, t),
        }
    }

    /// Samples `resolution + 1` points from `t = 0` to `t = 1`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, divisions: usize) -> Vec<Point2> {
        let res = self.resolution(divisions).max(1);
        (0..=res)
            .map(|i| self.point_at(i as f64 / res as f64))
            .collect()
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        match self {
            Self::Arc(arc) => Self::Arc(EllipseArc {
                center: arc.center + offset,
                ..arc.clone()
            }),
            _ => self.map_points(|p| p + offset),
        }
    }

    /// Returns a copy scaled uniformly about the origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Arc(arc) => Self::Arc(EllipseArc {
                center: arc.center * factor,
                radius_x: arc.radius_x * factor,
                radius_y: arc.radius_y * factor,
                ..arc.clone()
            }),
            _ => self.map_points(|p| p * factor),
        }
    }

    /// Returns a copy rotated counter-clockwise about the origin.
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        match self {
            Self::Arc(arc) => Self::Arc(EllipseArc {
                center: Point2::from(rotate_vector(&arc.center.coords, angle)),
                rotation: arc.rotation + angle,
                ..arc.clone()
            }),
            _ => self.map_points(|p| Point2::from(rotate_vector(&p.coords, angle))),
        }
    }

    fn map_points(&self, f: impl Fn(&Point2) -> Point2) -> Self {
        match self {
            Self::Line { from, to } => Self::Line {
                from: f(from),
                to: f(to),
            },
            Self::Quadratic { from, control, to } => Self::Quadratic {
                from: f(from),
                control: f(control),
                to: f(to),
            },
            Self::Cubic {
                from,
                control1,
                control2,
                to,
            } => Self::Cubic {
                from: f(from),
                control1: f(control1),
                control2: f(control2),
                to: f(to),
            },
            Self::Spline { points } => Self::Spline {
                points: points.iter().map(f).collect(),
            },
            Self::Arc(arc) => Self::Arc(arc.clone()),
        }
    }
}

/// Rotates a planar vector counter-clockwise by `angle`.
#[must_use]
pub fn rotate_vector(v: &Vector2, angle: f64) -> Vector2 {
    if angle.abs() < TOLERANCE {
        return *v;
    }
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

fn spline_point(points: &[Point2], t: f64) -> Point2 {
    match points.len() {
        0 => return Point2::origin(),
        1 => return points[0],
        _ => {}
    }
    let last = points.len() - 1;
    #[allow(clippy::cast_precision_loss)]
    let p = last as f64 * t;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = (p.floor().max(0.0) as usize).min(last);
    let weight = p - p.floor();

    let p0 = points[i.saturating_sub(1)];
    let p1 = points[i];
    let p2 = points[(i + 1).min(last)];
    let p3 = points[(i + 2).min(last)];

    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;
    let t2 = weight * weight;
    let t3 = weight * t2;
    let c = p1.coords;
    Point2::from(
        (c * 2.0 - p2.coords * 2.0 + v0 + v1) * t3
            + (c * -3.0 + p2.coords * 3.0 - v0 * 2.0 - v1) * t2
            + v0 * weight
            + c,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn line_samples_endpoints_only() {
        let seg = Segment::Line {
            from: Point2::new(0.0, 0.0),
            to: Point2::new(2.0, 0.0),
        };
        let pts = seg.sample(12);
        assert_eq!(pts.len(), 2);
        assert_relative_eq!(pts[1].x, 2.0);
    }

    #[test]
    fn line_ends_exactly_on_its_endpoint() {
        let to = Point2::new(7.794_228_634_059_948e-16, -12.727_922_061_357_855);
        let seg = Segment::Line {
            from: Point2::new(12.727_922_061_357_855, 0.0),
            to,
        };
        assert_eq!(seg.point_at(1.0), to);
        assert_eq!(seg.point_at(0.0), Point2::new(12.727_922_061_357_855, 0.0));
    }

    #[test]
    fn circle_uses_double_resolution() {
        let seg = Segment::Arc(EllipseArc::circle(Point2::origin(), 1.0));
        let pts = seg.sample(6);
        assert_eq!(pts.len(), 13);
        assert_relative_eq!(pts[0].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pts[3].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pts[12].x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_arc_sweeps_negative() {
        let seg = Segment::Arc(EllipseArc {
            clockwise: true,
            end_angle: FRAC_PI_2,
            ..EllipseArc::circle(Point2::origin(), 1.0)
        });
        // 0 -> π/2 clockwise goes the long way round, through -π/2.
        let mid = seg.point_at(1.0 / 3.0);
        assert_relative_eq!(mid.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn bezier_endpoints() {
        let seg = Segment::Cubic {
            from: Point2::new(0.0, 0.0),
            control1: Point2::new(0.0, 1.0),
            control2: Point2::new(1.0, 1.0),
            to: Point2::new(1.0, 0.0),
        };
        assert_relative_eq!(seg.point_at(1.0).x, 1.0);
        assert_relative_eq!(seg.point_at(0.5).y, 0.75);
    }

    #[test]
    fn spline_passes_through_points() {
        let seg = Segment::Spline {
            points: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 0.0)],
        };
        let mid = seg.point_at(0.5);
        assert_relative_eq!(mid.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mid.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rotated_arc_moves_centre_and_axis() {
        let arc = Segment::Arc(EllipseArc::circle(Point2::new(1.0, 0.0), 0.5));
        let Segment::Arc(r) = arc.rotated(FRAC_PI_2) else {
            panic!("expected arc");
        };
        assert_relative_eq!(r.center.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.center.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.rotation, FRAC_PI_2);
    }

    #[test]
    fn scaled_arc_scales_radii() {
        let arc = Segment::Arc(EllipseArc::circle(Point2::new(1.0, 1.0), 0.5));
        let Segment::Arc(s) = arc.scaled(2.0) else {
            panic!("expected arc");
        };
        assert_relative_eq!(s.radius_x, 1.0);
        assert_relative_eq!(s.center.y, 2.0);
    }
}
