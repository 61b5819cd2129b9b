use std::f64::consts::SQRT_2;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};
use crate::tessellation::TriangleMesh;

use super::{Blank, FaceIndex};

/// Triangle pairs forming each rhombus, fixed by the pyramid order in
/// [`rhombic_dodecahedron`].
pub const RHOMBIC_FACES: [[usize; 2]; 12] = [
    [0, 23],
    [1, 15],
    [2, 16],
    [3, 8],
    [4, 10],
    [5, 18],
    [6, 13],
    [7, 21],
    [9, 19],
    [11, 20],
    [12, 22],
    [14, 17],
];

/// Pyramid axis and the in-plane frame its base corners are laid out in.
fn pyramid_frames() -> [(Vector3, Vector3, Vector3); 6] {
    let (x, y, z) = (Vector3::x(), Vector3::y(), Vector3::z());
    [
        (y, z, x),
        (-y, x, z),
        (z, x, y),
        (-z, y, x),
        (-x, z, y),
        (x, y, z),
    ]
}

/// Builds a rhombic dodecahedron as six square pyramids on a hidden cube.
///
/// `size` is the distance between opposite faces.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` for a non-positive size.
pub fn rhombic_dodecahedron(size: f64) -> Result<Blank> {
    if size.is_nan() || size <= 0.0 {
        return Err(GeometryError::Degenerate(format!("rhombic dodecahedron of size {size}")).into());
    }
    let a = size / (2.0 * SQRT_2);

    let mut triangles = Vec::with_capacity(24);
    for (axis, u, v) in pyramid_frames() {
        let apex = Point3::from(axis * 2.0 * a);
        let base = axis * a;
        let corners = [u + v, v - u, -u - v, u - v].map(|d| Point3::from(base + d * a));
        for j in 0..4 {
            triangles.push([apex, corners[j], corners[(j + 1) % 4]]);
        }
    }

    Ok(Blank::from_mesh(
        "Rhombic Dodecahedron".to_string(),
        TriangleMesh::from_triangles(triangles),
        FaceIndex::Table(&RHOMBIC_FACES),
        RHOMBIC_FACES.len(),
    ))
}
