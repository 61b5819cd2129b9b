//! Base solids of CSG-built dice and their face-to-triangle maps.

mod barrel;
mod crystal;
mod rhombic;

pub use barrel::{barrel, BarrelParams};
pub use crystal::{crystal, CrystalClass, CrystalParams};
pub use rhombic::{rhombic_dodecahedron, RHOMBIC_FACES};

use std::f64::consts::TAU;

use crate::error::{ConstructionError, GeometryError, Result};
use crate::math::polygon_2d::convex_hull;
use crate::math::{Point2, Point3, Vector3, LINEAR_TOLERANCE};
use crate::operations::csg::PlanarFace;
use crate::operations::projection::{CoplanarProjection, ProjectCoplanar};
use crate::tessellation::TriangleMesh;

/// How logical faces map to triangles of a blank's mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum FaceIndex {
    /// Every face is `per_face` consecutive triangles.
    Uniform { per_face: usize },
    /// `sides` side faces first, then the caps.
    Barrel {
        sides: usize,
        per_side: usize,
        per_cap: usize,
    },
    /// A fixed list of triangle pairs.
    Table(&'static [[usize; 2]]),
}

impl FaceIndex {
    /// Triangle indices making up logical face `face`.
    #[must_use]
    pub fn triangles(&self, face: usize) -> Vec<usize> {
        match *self {
            Self::Uniform { per_face } => (face * per_face..(face + 1) * per_face).collect(),
            Self::Barrel {
                sides,
                per_side,
                per_cap,
            } => {
                let start = if face < sides {
                    face * per_side
                } else {
                    sides * per_side + (face - sides) * per_cap
                };
                let len = if face < sides { per_side } else { per_cap };
                (start..start + len).collect()
            }
            Self::Table(table) => table.get(face).map(|pair| pair.to_vec()).unwrap_or_default(),
        }
    }
}

/// The undecorated solid of a die.
#[derive(Debug, Clone)]
pub struct Blank {
    pub name: String,
    pub mesh: TriangleMesh,
    face_index: FaceIndex,
    face_count: usize,
}

impl Blank {
    /// Builds a blank whose mesh is `faces` laid out one after another.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::UnexpectedTopology` when the layout does
    /// not agree with `face_index`.
    pub(crate) fn from_faces(
        name: String,
        faces: Vec<Vec<[Point3; 3]>>,
        face_index: FaceIndex,
    ) -> Result<Self> {
        let mut next = 0;
        for (i, tris) in faces.iter().enumerate() {
            let expected: Vec<usize> = (next..next + tris.len()).collect();
            if face_index.triangles(i) != expected {
                return Err(ConstructionError::UnexpectedTopology(format!(
                    "{name}: face {i} has {} triangles at {next}, index says {:?}",
                    tris.len(),
                    face_index.triangles(i)
                ))
                .into());
            }
            next += tris.len();
        }
        let face_count = faces.len();
        Ok(Self {
            name,
            mesh: TriangleMesh::from_triangles(faces.into_iter().flatten()),
            face_index,
            face_count,
        })
    }

    pub(crate) fn from_mesh(name: String, mesh: TriangleMesh, face_index: FaceIndex, face_count: usize) -> Self {
        Self {
            name,
            mesh,
            face_index,
            face_count,
        }
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Indices of the triangles of logical face `face`.
    #[must_use]
    pub fn face_index(&self, face: usize) -> Vec<usize> {
        self.face_index.triangles(face)
    }

    /// Corner points of `face`, counter-clockwise seen from outside.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the face has no usable triangles.
    pub fn face_boundary(&self, face: usize) -> Result<Vec<Point3>> {
        let triangles = self.face_index(face);
        if triangles.iter().any(|&t| t >= self.mesh.triangle_count()) {
            return Err(GeometryError::Degenerate(format!("face {face} is out of range")).into());
        }
        let normal = triangles
            .iter()
            .map(|&t| self.mesh.triangle_normal(t))
            .find(|n| n.norm() > 0.5)
            .ok_or_else(|| GeometryError::Degenerate(format!("face {face} has no area")))?;
        let points: Vec<Point3> = triangles
            .iter()
            .flat_map(|&t| self.mesh.triangle(t))
            .collect();
        let boundary = hull_in_plane(&points, &normal);
        if boundary.len() < 3 {
            return Err(GeometryError::Degenerate(format!("face {face} is a sliver")).into());
        }
        Ok(boundary)
    }

    /// Projects `face` into its own +Z-facing frame, spun so `up` reads upwards.
    ///
    /// # Errors
    ///
    /// Propagates boundary extraction and projection failures.
    pub fn project_face(&self, face: usize, up: Vector3) -> Result<CoplanarProjection> {
        let boundary = self.face_boundary(face)?;
        ProjectCoplanar::new(&boundary).with_up(up).execute()
    }
}

/// Convex hull of coplanar points, counter-clockwise about `normal`.
fn hull_in_plane(points: &[Point3], normal: &Vector3) -> Vec<Point3> {
    let Some(&origin) = points.first() else {
        return Vec::new();
    };
    let u = if normal.x.abs() < 0.9 {
        normal.cross(&Vector3::x())
    } else {
        normal.cross(&Vector3::y())
    }
    .normalize();
    let v = normal.cross(&u);
    let flat: Vec<Point2> = points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect();
    convex_hull(&flat, LINEAR_TOLERANCE)
        .iter()
        .map(|q| origin + u * q.x + v * q.y)
        .collect()
}

/// Azimuth of a direction about the Y axis, in `[0, 2π)`, zero on +Z.
#[must_use]
pub fn azimuth(v: &Vector3) -> f64 {
    v.x.atan2(v.z).rem_euclid(TAU)
}

/// Sorts faces by class, then by azimuth of their normal.
pub(crate) fn order_faces(
    mut faces: Vec<PlanarFace>,
    class: impl Fn(&PlanarFace) -> usize,
) -> Vec<PlanarFace> {
    faces.sort_by(|a, b| {
        class(a)
            .cmp(&class(b))
            .then(azimuth(&a.normal).total_cmp(&azimuth(&b.normal)))
    });
    faces
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn uniform_index() {
        let index = FaceIndex::Uniform { per_face: 2 };
        assert_eq!(index.triangles(0), vec![0, 1]);
        assert_eq!(index.triangles(4), vec![8, 9]);
    }

    #[test]
    fn barrel_index() {
        let index = FaceIndex::Barrel {
            sides: 6,
            per_side: 6,
            per_cap: 2,
        };
        assert_eq!(index.triangles(1), (6..12).collect::<Vec<_>>());
        assert_eq!(index.triangles(6), vec![36, 37]);
        assert_eq!(index.triangles(17), vec![58, 59]);
    }

    #[test]
    fn layout_mismatch_is_reported() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![vec![tri], vec![tri, tri]];
        assert!(Blank::from_faces("x".into(), faces, FaceIndex::Uniform { per_face: 1 }).is_err());
    }

    #[test]
    fn azimuth_wraps() {
        assert!(azimuth(&Vector3::z()).abs() < 1e-12);
        assert!((azimuth(&-Vector3::x()) - 1.5 * std::f64::consts::PI).abs() < 1e-12);
    }
}
