use std::f64::consts::PI;

use crate::error::{ConstructionError, Result};
use crate::operations::csg::primitives::pyramid;
use crate::operations::csg::PlanarFace;
use crate::tessellation::fan;

use super::{order_faces, Blank, FaceIndex};

/// Two opposed pyramids sharing one ring of base corners, possibly twisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrystalParams {
    pub sides: usize,
    /// Circumradius of the shared ring.
    pub radius: f64,
    /// Height of the upper pyramid above the ring.
    pub cap_height: f64,
    /// Depth of the lower pyramid below the ring.
    pub main_height: f64,
    /// Rotation of the lower pyramid against the upper one, in radians.
    pub twist: f64,
}

/// Shape family of a crystal, decided by its twist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalClass {
    /// No twist: triangular faces.
    Dipyramid,
    /// Twisted by half a side: kite faces meeting on a regular zigzag.
    Antidipyramid,
    /// Any other twist.
    Twisted,
}

impl CrystalParams {
    #[must_use]
    pub fn class(&self) -> CrystalClass {
        #[allow(clippy::cast_precision_loss)]
        let half_sides = self.twist / (PI / self.sides as f64);
        if half_sides.abs() <= 1e-9 {
            CrystalClass::Dipyramid
        } else if (half_sides - 1.0).abs() <= 1e-9 {
            CrystalClass::Antidipyramid
        } else {
            CrystalClass::Twisted
        }
    }

    #[must_use]
    pub fn is_uneven(&self) -> bool {
        (self.cap_height - self.main_height).abs() > f64::EPSILON
    }

    /// Human-readable name of the solid.
    #[must_use]
    pub fn name(&self) -> String {
        let (di, anti) = match self.sides {
            3 => ("Trigonal Dipyramid".to_string(), "Rhombohedron".to_string()),
            4 => (
                "Square Dipyramid".to_string(),
                "Tetragonal Trapezohedron".to_string(),
            ),
            5 => (
                "Pentagonal Dipyramid".to_string(),
                "Pentagonal Trapezohedron".to_string(),
            ),
            6 => (
                "Hexagonal Dipyramid".to_string(),
                "Hexagonal Trapezohedron".to_string(),
            ),
            n => (format!("{n}-gonal Dipyramid"), format!("{n}-gonal Trapezohedron")),
        };
        let prefix = if self.is_uneven() { "Uneven " } else { "" };
        match self.class() {
            CrystalClass::Dipyramid => format!("{prefix}{di}"),
            CrystalClass::Antidipyramid => format!("{prefix}{anti}"),
            CrystalClass::Twisted => format!("{prefix}Twisted {anti}"),
        }
    }
}

fn half(face: &PlanarFace) -> usize {
    usize::from(face.normal.y >= 0.0)
}

/// Builds a crystal blank.
///
/// Faces `0..sides` belong to the lower pyramid, ordered by azimuth from +Z;
/// the upper faces follow in the same order.
///
/// # Errors
///
/// Returns `ConstructionError::InvalidSideCount` for fewer than three sides
/// and `ConstructionError::UnexpectedTopology` if the intersection does not
/// yield `2 * sides` faces.
pub fn crystal(params: &CrystalParams) -> Result<Blank> {
    let CrystalParams {
        sides,
        radius,
        cap_height,
        main_height,
        twist,
    } = *params;
    if sides < 3 {
        return Err(ConstructionError::InvalidSideCount {
            sides,
            reason: "a crystal needs at least three sides",
        }
        .into());
    }

    let top = (main_height + cap_height) / 2.0;
    // Both pyramids run past the opposite apex so only their tips survive.
    let cap_length = main_height + 2.0 * cap_height;
    let main_length = 2.0 * main_height + cap_height;
    let cap = pyramid(
        sides,
        radius * cap_length / cap_height,
        top,
        top - cap_length,
        0.0,
    )?;
    let main = pyramid(
        sides,
        radius * main_length / main_height,
        -top,
        main_length - top,
        twist,
    )?;

    let faces = order_faces(cap.intersect(&main).planar_faces(), half);
    if faces.len() != 2 * sides {
        return Err(ConstructionError::UnexpectedTopology(format!(
            "crystal with {sides} sides has {} faces",
            faces.len()
        ))
        .into());
    }

    let corners = match params.class() {
        CrystalClass::Dipyramid => 3,
        _ => 4,
    };
    let mut triangles = Vec::with_capacity(faces.len());
    for face in &faces {
        if face.boundary.len() != corners {
            return Err(ConstructionError::UnexpectedTopology(format!(
                "crystal face has {} corners, expected {corners}",
                face.boundary.len()
            ))
            .into());
        }
        triangles.push(fan(&face.boundary));
    }

    Blank::from_faces(
        params.name(),
        triangles,
        FaceIndex::Uniform {
            per_face: corners - 2,
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn params(sides: usize, twist: f64) -> CrystalParams {
        CrystalParams {
            sides,
            radius: 8.0,
            cap_height: 8.0,
            main_height: 8.0,
            twist,
        }
    }

    #[test]
    fn pentagonal_classification() {
        let di = params(5, 0.0);
        assert_eq!(di.class(), CrystalClass::Dipyramid);
        assert_eq!(di.name(), "Pentagonal Dipyramid");
        let blank = crystal(&di).unwrap();
        assert_eq!(blank.mesh.triangle_count(), 10);
        assert_eq!(blank.face_index(3), vec![3]);

        let anti = params(5, PI / 5.0);
        assert_eq!(anti.name(), "Pentagonal Trapezohedron");
        let blank = crystal(&anti).unwrap();
        assert_eq!(blank.mesh.triangle_count(), 20);
        assert_eq!(blank.face_index(3), vec![6, 7]);

        let twisted = params(5, 0.3);
        assert_eq!(twisted.class(), CrystalClass::Twisted);
        assert_eq!(twisted.name(), "Twisted Pentagonal Trapezohedron");
    }

    #[test]
    fn uneven_and_unnamed_families() {
        let mut p = params(3, PI / 3.0);
        p.main_height = 12.0;
        assert_eq!(p.name(), "Uneven Rhombohedron");
        assert_eq!(params(7, 0.0).name(), "7-gonal Dipyramid");
    }

    #[test]
    fn lower_faces_come_first() {
        let mut p = params(4, 0.0);
        p.cap_height = 4.0;
        p.main_height = 16.0;
        let blank = crystal(&p).unwrap();
        assert_eq!(blank.face_count(), 8);
        for face in 0..4 {
            let normal = blank.mesh.triangle_normal(blank.face_index(face)[0]);
            assert!(normal.y < 0.0);
        }
        let lowest = (0..blank.mesh.vertices.len())
            .map(|i| blank.mesh.vertices[i].y)
            .fold(f64::MAX, f64::min);
        assert_relative_eq!(lowest, -10.0, epsilon = 1e-9);
    }

    #[test]
    fn twisted_faces_are_planar_kites() {
        let blank = crystal(&params(6, 0.2)).unwrap();
        for face in 0..12 {
            assert_eq!(blank.face_boundary(face).unwrap().len(), 4);
            assert!(blank.project_face(face, crate::math::Vector3::y()).is_ok());
        }
    }
}
