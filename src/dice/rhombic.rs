use tracing::debug;

use crate::blank::rhombic_dodecahedron;
use crate::error::Result;
use crate::legend::pick_for_number;
use crate::math::Vector3;

use super::{face_from_blank, Dial, DieModel, DieParams, DieShape};

const DIALS: [Dial; 1] = [Dial {
    id: "rhombic_size",
    name: "Size",
    description: "Distance between opposite faces",
    default: 18.0,
    min: 6.0,
    max: 60.0,
    step: 0.5,
}];

/// A d12 built on the rhombic dodecahedron.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhombicDie;

impl DieModel for RhombicDie {
    fn id(&self) -> &'static str {
        "d12_rhombic"
    }

    fn name(&self) -> &'static str {
        "D12 Rhombic"
    }

    fn dials(&self) -> &[Dial] {
        &DIALS
    }

    fn build(&self, params: &DieParams) -> Result<DieShape> {
        let size = params.value(&DIALS[0]);
        let blank = rhombic_dodecahedron(size)?;
        debug!(size, "built rhombic blank");

        let count = blank.face_count();
        let normals: Vec<Vector3> = (0..count)
            .map(|f| {
                blank
                    .face_index(f)
                    .first()
                    .map_or_else(Vector3::zeros, |&t| blank.mesh.triangle_normal(t))
            })
            .collect();

        // Low numbers take faces in table order; each high number sits opposite.
        let mut order = vec![None; count];
        let mut used = vec![false; count];
        let mut next = 0;
        for number in 1..=count / 2 {
            while used[next] {
                next += 1;
            }
            let face = next;
            let opposite = (0..count)
                .filter(|&f| !used[f] && f != face)
                .min_by(|&a, &b| normals[a].dot(&normals[face]).total_cmp(&normals[b].dot(&normals[face])))
                .unwrap_or(face);
            used[face] = true;
            used[opposite] = true;
            order[number - 1] = Some(face);
            order[count - number] = Some(opposite);
        }

        let mut faces = Vec::with_capacity(count);
        for (index, face) in order.into_iter().flatten().enumerate() {
            faces.push(face_from_blank(
                &blank,
                face,
                Vector3::y(),
                true,
                pick_for_number(index, count),
            )?);
        }

        Ok(DieShape {
            name: blank.name,
            faces,
            face_to_face: size,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::legend::Legend;

    #[test]
    fn twelve_rhombi_with_opposites() {
        let shape = RhombicDie.build(&DieParams::new()).unwrap();
        assert_eq!(shape.faces.len(), 12);
        assert_relative_eq!(shape.face_to_face, 18.0);
        assert_eq!(shape.faces[11].default_legend, Legend::TWELVE);
        for number in 1..=12 {
            let a = &shape.faces[number - 1].placement;
            let b = &shape.faces[12 - number].placement;
            assert_relative_eq!(
                (a.translation.vector + b.translation.vector).norm(),
                0.0,
                epsilon = 1e-9
            );
            assert_relative_eq!(a.translation.vector.norm(), 9.0, epsilon = 1e-9);
        }
        assert_eq!(shape.faces[0].outline.points(1).len(), 4);
    }
}
