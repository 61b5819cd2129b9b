use crate::math::polygon_2d::signed_area;
use crate::math::{Point2, Vector2, LINEAR_TOLERANCE};

use super::curve::Segment;

/// Sampling density used when a caller does not ask for one.
pub const DEFAULT_DIVISIONS: usize = 12;

/// A closed loop of curve segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    segments: Vec<Segment>,
}

impl Contour {
    /// Creates a contour from segments laid end to end.
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Creates a closed polygonal contour through `points`.
    #[must_use]
    pub fn polygon(points: &[Point2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::Line {
                from: points[i],
                to: points[(i + 1) % n],
            })
            .collect();
        Self { segments }
    }

    /// The segments making up the loop.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Samples the loop into a polygon without a repeated closing point.
    ///
    /// Each segment contributes its samples up to, but not including, its end
    /// point, so a line contributes only its start. Points closer than
    /// [`LINEAR_TOLERANCE`] to their predecessor are dropped.
    #[must_use]
    pub fn points(&self, divisions: usize) -> Vec<Point2> {
        let mut out: Vec<Point2> = Vec::new();
        for segment in &self.segments {
            let mut samples = segment.sample(divisions);
            samples.pop();
            for p in samples {
                if out.last().is_some_and(|last| (last - p).norm() < LINEAR_TOLERANCE) {
                    continue;
                }
                out.push(p);
            }
        }
        while out.len() > 1 && (out[0] - out[out.len() - 1]).norm() < LINEAR_TOLERANCE {
            out.pop();
        }
        out
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        self.map(|s| s.translated(offset))
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|s| s.scaled(factor))
    }

    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        self.map(|s| s.rotated(angle))
    }

    fn map(&self, f: impl Fn(&Segment) -> Segment) -> Self {
        Self {
            segments: self.segments.iter().map(f).collect(),
        }
    }
}

/// A planar region: a closed outer boundary with zero or more holes.
///
/// Shapes are immutable; transforms return new shapes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    outer: Contour,
    holes: Vec<Contour>,
}

impl Shape {
    /// Creates a shape from an outer contour and its holes.
    #[must_use]
    pub fn new(outer: Contour, holes: Vec<Contour>) -> Self {
        Self { outer, holes }
    }

    /// Creates a hole-free polygonal shape.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Self {
        Self::new(Contour::polygon(points), Vec::new())
    }

    /// Returns a copy with `hole` added.
    #[must_use]
    pub fn with_hole(mut self, hole: Contour) -> Self {
        self.holes.push(hole);
        self
    }

    #[must_use]
    pub fn outer(&self) -> &Contour {
        &self.outer
    }

    #[must_use]
    pub fn holes(&self) -> &[Contour] {
        &self.holes
    }

    /// Sampled outer boundary.
    #[must_use]
    pub fn points(&self, divisions: usize) -> Vec<Point2> {
        self.outer.points(divisions)
    }

    /// Sampled hole boundaries.
    #[must_use]
    pub fn hole_points(&self, divisions: usize) -> Vec<Vec<Point2>> {
        self.holes.iter().map(|h| h.points(divisions)).collect()
    }

    /// Unsigned area enclosed by the outer boundary (holes ignored).
    #[must_use]
    pub fn area(&self, divisions: usize) -> f64 {
        signed_area(&self.points(divisions)).abs()
    }

    /// Axis-aligned bounds of the sampled outer boundary, or `None` when empty.
    #[must_use]
    pub fn bounds(&self, divisions: usize) -> Option<(Point2, Point2)> {
        bounds_of(self.points(divisions).iter())
    }

    #[must_use]
    pub fn translated(&self, offset: &Vector2) -> Self {
        self.map(|c| c.translated(offset))
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|c| c.scaled(factor))
    }

    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        self.map(|c| c.rotated(angle))
    }

    fn map(&self, f: impl Fn(&Contour) -> Contour) -> Self {
        Self {
            outer: f(&self.outer),
            holes: self.holes.iter().map(f).collect(),
        }
    }
}

/// Axis-aligned bounds of a point stream.
pub(crate) fn bounds_of<'a>(points: impl Iterator<Item = &'a Point2>) -> Option<(Point2, Point2)> {
    points.fold(None, |acc, p| match acc {
        None => Some((*p, *p)),
        Some((lo, hi)) => Some((
            Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
        )),
    })
}
