use crate::geometry::shape::bounds_of;
use crate::geometry::{Shape, DEFAULT_DIVISIONS};
use crate::math::{Point2, Vector2};

/// Moves every shape by `offset`.
#[must_use]
pub fn translate(shapes: &[Shape], offset: &Vector2) -> Vec<Shape> {
    shapes.iter().map(|s| s.translated(offset)).collect()
}

/// Scales every shape uniformly about the origin.
#[must_use]
pub fn scale(shapes: &[Shape], factor: f64) -> Vec<Shape> {
    shapes.iter().map(|s| s.scaled(factor)).collect()
}

/// Rotates every shape counter-clockwise about the origin.
#[must_use]
pub fn rotate(shapes: &[Shape], angle: f64) -> Vec<Shape> {
    shapes.iter().map(|s| s.rotated(angle)).collect()
}

/// Bounding box shared by all shapes' sampled outer boundaries.
#[must_use]
pub fn shared_bounds(shapes: &[Shape]) -> Option<(Point2, Point2)> {
    let points: Vec<Point2> = shapes
        .iter()
        .flat_map(|s| s.points(DEFAULT_DIVISIONS))
        .collect();
    bounds_of(points.iter())
}

/// Translates all shapes by one offset so their shared bounding box is centred on the origin.
#[must_use]
pub fn center(shapes: &[Shape]) -> Vec<Shape> {
    let Some((lo, hi)) = shared_bounds(shapes) else {
        return shapes.to_vec();
    };
    let mid = Point2::from((lo.coords + hi.coords) * 0.5);
    translate(shapes, &(-mid.coords))
}

/// How a legend is placed on its face: applied as scale, then rotation, then offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub rotation: f64,
    pub offset: Vector2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            offset: Vector2::zeros(),
        }
    }
}

impl Placement {
    /// Applies the placement to a set of (pre-centred) symbols.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn apply(&self, shapes: &[Shape]) -> Vec<Shape> {
        let mut out = shapes.to_vec();
        if self.scale != 1.0 {
            out = scale(&out, self.scale);
        }
        if self.rotation != 0.0 {
            out = rotate(&out, self.rotation);
        }
        if self.offset.norm_squared() != 0.0 {
            out = translate(&out, &self.offset);
        }
        out
    }
}
