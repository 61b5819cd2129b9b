use crate::math::Point3;

use super::plane::Plane;

/// A convex planar polygon, counter-clockwise when seen from its front side.
#[derive(Debug, Clone)]
pub struct CsgPolygon {
    pub vertices: Vec<Point3>,
    pub plane: Plane,
}

impl CsgPolygon {
    /// Creates a polygon, deriving its plane from the first non-degenerate corner.
    ///
    /// Returns `None` when all vertices are collinear.
    #[must_use]
    pub fn new(vertices: Vec<Point3>) -> Option<Self> {
        let n = vertices.len();
        let plane = (1..n.saturating_sub(1))
            .find_map(|i| Plane::from_points(&vertices[0], &vertices[i], &vertices[i + 1]))?;
        Some(Self { vertices, plane })
    }

    pub(crate) fn with_plane(vertices: Vec<Point3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Area of the polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        let v = &self.vertices;
        (1..v.len().saturating_sub(1))
            .map(|i| (v[i] - v[0]).cross(&(v[i + 1] - v[0])).norm() * 0.5)
            .sum()
    }
}
