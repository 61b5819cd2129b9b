use std::f64::consts::TAU;

use crate::error::{ConstructionError, Result};
use crate::math::LINEAR_TOLERANCE;
use crate::operations::csg::primitives::{prism, pyramid};
use crate::operations::csg::PlanarFace;
use crate::tessellation::{centroid_fan, fan};

use super::{order_faces, Blank, FaceIndex};

/// Dimensions of a barrel: a prism with a pyramid on each end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrelParams {
    pub sides: usize,
    /// Circumradius of the prism.
    pub radius: f64,
    /// Height of each pyramidal cap.
    pub cap_height: f64,
    /// Height of the prismatic body.
    pub main_height: f64,
    /// Rotation of the caps against the body, as a fraction of one side.
    /// Values outside `[0, 1)` mean no twist.
    pub twist: f64,
}

impl BarrelParams {
    fn twist_angle(&self) -> f64 {
        if (0.0..1.0).contains(&self.twist) {
            #[allow(clippy::cast_precision_loss)]
            let side = TAU / self.sides as f64;
            side * self.twist
        } else {
            0.0
        }
    }
}

const SIDE: usize = 0;
const TOP: usize = 1;
const BOTTOM: usize = 2;

fn class(face: &PlanarFace) -> usize {
    if face.normal.y.abs() < LINEAR_TOLERANCE {
        SIDE
    } else if face.normal.y > 0.0 {
        TOP
    } else {
        BOTTOM
    }
}

/// Builds a barrel blank.
///
/// Faces `0..sides` are the body, ordered by azimuth from +Z; the top caps
/// follow, then the bottom caps.
///
/// # Errors
///
/// Returns `ConstructionError::InvalidSideCount` for fewer than three sides
/// and `ConstructionError::UnexpectedTopology` if the intersection does not
/// yield the expected faces.
pub fn barrel(params: &BarrelParams) -> Result<Blank> {
    let BarrelParams {
        sides,
        radius,
        cap_height,
        main_height,
        ..
    } = *params;
    if sides < 3 {
        return Err(ConstructionError::InvalidSideCount {
            sides,
            reason: "a barrel needs at least three sides",
        }
        .into());
    }
    let twist = params.twist_angle();
    let twisted = twist > 0.0;

    // Each cap pyramid runs past the far end of the body so only its tip survives.
    let apex = main_height / 2.0 + cap_height;
    let length = main_height + 3.0 * cap_height;
    let base_radius = radius * length / cap_height;

    let top = pyramid(sides, base_radius, apex, apex - length, twist)?;
    let bottom = pyramid(sides, base_radius, -apex, length - apex, -twist)?;
    let body = prism(sides, radius, main_height + 5.0 * cap_height, 0.0)?;
    let solid = body.intersect(&top).intersect(&bottom);

    let faces = order_faces(solid.planar_faces(), class);
    let found = faces.iter().map(class).fold([0; 3], |mut n, c| {
        n[c] += 1;
        n
    });
    if found != [sides; 3] {
        return Err(ConstructionError::UnexpectedTopology(format!(
            "barrel with {sides} sides has {found:?} side/top/bottom faces"
        ))
        .into());
    }

    let (side_corners, cap_corners) = if twisted { (6, 4) } else { (4, 3) };
    let mut triangles = Vec::with_capacity(faces.len());
    for face in &faces {
        let is_side = class(face) == SIDE;
        let expected = if is_side { side_corners } else { cap_corners };
        if face.boundary.len() != expected {
            return Err(ConstructionError::UnexpectedTopology(format!(
                "barrel face has {} corners, expected {expected}",
                face.boundary.len()
            ))
            .into());
        }
        triangles.push(if is_side {
            centroid_fan(&face.boundary)
        } else {
            fan(&face.boundary)
        });
    }

    let name = format!(
        "{sides}-Sided Uniform Prism with {}Pyramidal Caps",
        if twisted { "Twisted " } else { "" }
    );
    let face_index = FaceIndex::Barrel {
        sides,
        per_side: side_corners,
        per_cap: cap_corners - 2,
    };
    Blank::from_faces(name, triangles, face_index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Vector3;

    fn params(sides: usize, twist: f64) -> BarrelParams {
        BarrelParams {
            sides,
            radius: 7.0,
            cap_height: 6.0,
            main_height: 16.0,
            twist,
        }
    }

    #[test]
    fn untwisted_hexagonal_barrel_layout() {
        let blank = barrel(&params(6, 0.0)).unwrap();
        assert_eq!(blank.name, "6-Sided Uniform Prism with Pyramidal Caps");
        assert_eq!(blank.face_count(), 18);
        assert_eq!(blank.mesh.triangle_count(), 6 * 4 + 12);
        assert_eq!(blank.face_index(0), vec![0, 1, 2, 3]);
        assert_eq!(blank.face_index(5), vec![20, 21, 22, 23]);
        assert_eq!(blank.face_index(6), vec![24]);
        assert_eq!(blank.face_index(11), vec![29]);
    }

    #[test]
    fn side_faces_are_body_rectangles() {
        let blank = barrel(&params(6, 0.0)).unwrap();
        let boundary = blank.face_boundary(0).unwrap();
        assert_eq!(boundary.len(), 4);
        let top = boundary.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert_relative_eq!(top, 8.0, epsilon = 1e-9);
        let projection = blank.project_face(0, Vector3::y()).unwrap();
        assert!(projection.normal.y.abs() < 1e-9);
    }

    #[test]
    fn twisted_barrel_layout() {
        let blank = barrel(&params(4, 0.5)).unwrap();
        assert_eq!(blank.name, "4-Sided Uniform Prism with Twisted Pyramidal Caps");
        assert_eq!(blank.mesh.triangle_count(), 4 * 6 + 8 * 2);
        assert_eq!(blank.face_index(4), vec![24, 25]);
        assert_eq!(blank.face_boundary(0).unwrap().len(), 6);
    }

    #[test]
    fn out_of_range_twist_is_ignored() {
        let blank = barrel(&params(5, 1.0)).unwrap();
        assert!(!blank.name.contains("Twisted"));
    }

    #[test]
    fn too_few_sides() {
        assert!(barrel(&params(2, 0.0)).is_err());
    }
}
