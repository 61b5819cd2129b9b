mod cleanup;
mod triangulate;

pub use cleanup::{find_bad_edges, remove_duplicate_triangles, weld, BadEdge};
pub use triangulate::{centroid_fan, fan, TriangulatePolygon};

use crate::math::{Isometry3, Point3, Vector3};

/// Sampling density used when turning curved outlines into polygons.
pub const PREVIEW_DIVISIONS: usize = 12;

/// Sampling density used for export.
pub const EXPORT_DIVISIONS: usize = 24;

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TessellationParams {
    /// Samples per curve segment (arcs use twice this many).
    pub divisions: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            divisions: PREVIEW_DIVISIONS,
        }
    }
}

impl TessellationParams {
    /// High-resolution parameters for export.
    #[must_use]
    pub fn export() -> Self {
        Self {
            divisions: EXPORT_DIVISIONS,
        }
    }
}

/// A triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle, counter-clockwise from outside).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Builds an unwelded mesh from loose triangles with flat normals.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_triangles(triangles: impl IntoIterator<Item = [Point3; 3]>) -> Self {
        let mut mesh = Self::default();
        for tri in triangles {
            let normal = (tri[1] - tri[0])
                .cross(&(tri[2] - tri[0]))
                .try_normalize(0.0)
                .unwrap_or_else(Vector3::zeros);
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&tri);
            mesh.normals.extend_from_slice(&[normal; 3]);
            mesh.indices.push([base, base + 1, base + 2]);
        }
        mesh
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Corner positions of triangle `i`.
    #[must_use]
    pub fn triangle(&self, i: usize) -> [Point3; 3] {
        self.indices[i].map(|v| self.vertices[v as usize])
    }

    /// Unit normal of triangle `i` from its winding, or zero if degenerate.
    #[must_use]
    pub fn triangle_normal(&self, i: usize) -> Vector3 {
        let [a, b, c] = self.triangle(i);
        (b - a).cross(&(c - a)).try_normalize(0.0).unwrap_or_else(Vector3::zeros)
    }

    /// Total surface area.
    #[must_use]
    pub fn area(&self) -> f64 {
        (0..self.indices.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }

    /// Appends another mesh, re-basing its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &TriangleMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|t| t.map(|i| i + base)));
    }

    /// Returns a copy with every vertex and normal moved by `iso`.
    #[must_use]
    pub fn transformed(&self, iso: &Isometry3) -> TriangleMesh {
        TriangleMesh {
            vertices: self.vertices.iter().map(|p| iso * p).collect(),
            normals: self.normals.iter().map(|n| iso * n).collect(),
            indices: self.indices.clone(),
        }
    }

    /// Returns a copy containing only the listed triangles.
    #[must_use]
    pub fn select(&self, triangles: &[usize]) -> TriangleMesh {
        TriangleMesh::from_triangles(triangles.iter().map(|&i| self.triangle(i)))
    }

    /// Recomputes vertex normals as area-weighted averages of adjacent triangles.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for i in 0..self.indices.len() {
            let [a, b, c] = self.triangle(i);
            let n = (b - a).cross(&(c - a));
            for v in self.indices[i] {
                normals[v as usize] += n;
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize(0.0).unwrap_or_else(Vector3::zeros))
            .collect();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Rotation3;

    fn unit_triangle() -> [Point3; 3] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn loose_triangles_get_flat_normals() {
        let mesh = TriangleMesh::from_triangles([unit_triangle()]);
        assert_eq!(mesh.vertices.len(), 3);
        assert_relative_eq!(mesh.normals[2].z, 1.0);
        assert_relative_eq!(mesh.area(), 0.5);
    }

    #[test]
    fn merge_rebases_indices() {
        let mut a = TriangleMesh::from_triangles([unit_triangle()]);
        let b = TriangleMesh::from_triangles([unit_triangle()]);
        a.merge(&b);
        assert_eq!(a.triangle_count(), 2);
        assert_eq!(a.indices[1], [3, 4, 5]);
    }

    #[test]
    fn transform_rotates_normals() {
        let mesh = TriangleMesh::from_triangles([unit_triangle()]);
        let iso = Isometry3::from_parts(
            Vector3::new(0.0, 0.0, 5.0).into(),
            Rotation3::from_axis_angle(&Vector3::x_axis(), std::f64::consts::FRAC_PI_2),
        );
        let moved = mesh.transformed(&iso);
        assert_relative_eq!(moved.vertices[0].z, 5.0);
        assert_relative_eq!(moved.normals[0].y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(moved.triangle_normal(0).y, -1.0, epsilon = 1e-12);
    }
}
