use std::f64::consts::PI;

use tracing::debug;

use crate::blank::{crystal, CrystalParams};
use crate::error::{ConstructionError, Result};
use crate::legend::{pick_for_doubles_by_index, pick_for_number};
use crate::math::Vector3;

use super::{face_from_blank, face_to_face, top_ring_slots, Dial, DieModel, DieParams, DieShape};

const DIALS: [Dial; 2] = [
    Dial {
        id: "radius",
        name: "Radius",
        description: "Distance from the centre axis to an edge vertex",
        default: 16.0,
        min: 10.0,
        max: 60.0,
        step: 0.05,
    },
    Dial {
        id: "height",
        name: "Height",
        description: "Distance from tip to tip",
        default: 28.0,
        min: 10.0,
        max: 60.0,
        step: 0.05,
    },
];

/// An even dipyramid or trapezohedron numbered on every face, opposite
/// faces summing to `sides + 1`.
#[derive(Debug, Clone, Copy)]
pub struct TrapezohedronDie {
    id: &'static str,
    name: &'static str,
    sides: usize,
    tens: bool,
}

impl TrapezohedronDie {
    #[must_use]
    pub const fn new(id: &'static str, name: &'static str, sides: usize) -> Self {
        Self {
            id,
            name,
            sides,
            tens: false,
        }
    }

    #[must_use]
    pub const fn tens(mut self) -> Self {
        self.tens = true;
        self
    }
}

impl DieModel for TrapezohedronDie {
    fn id(&self) -> &'static str {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn dials(&self) -> &[Dial] {
        &DIALS
    }

    fn build(&self, params: &DieParams) -> Result<DieShape> {
        let sides = self.sides;
        let half = sides / 2;
        if sides % 2 != 0 || half < 3 {
            return Err(ConstructionError::InvalidSideCount {
                sides,
                reason: "a trapezohedron needs an even number of faces, at least six",
            }
            .into());
        }

        let [radius, height] = DIALS.map(|d| params.value(&d));
        // Odd rings only have opposite faces once the halves are offset.
        #[allow(clippy::cast_precision_loss)]
        let twist = if half % 2 == 1 { PI / half as f64 } else { 0.0 };
        let blank = crystal(&CrystalParams {
            sides: half,
            radius,
            cap_height: height / 2.0,
            main_height: height / 2.0,
            twist,
        })?;
        debug!(die = self.id, blank = %blank.name, "built trapezohedron blank");

        // Blank faces `half..sides` form the upper ring.
        let centroids: Vec<Vector3> = (0..sides)
            .map(|i| -> Result<Vector3> {
                let boundary = blank.face_boundary(i)?;
                #[allow(clippy::cast_precision_loss)]
                let n = boundary.len() as f64;
                Ok(boundary.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n)
            })
            .collect::<Result<_>>()?;

        let mut order = vec![0; sides];
        for (k, slot) in top_ring_slots(half).into_iter().enumerate() {
            let top = half + slot;
            let number = 2 * k + 1;
            let opposite = (0..half)
                .min_by(|&a, &b| {
                    let da = (centroids[a] + centroids[top]).norm();
                    let db = (centroids[b] + centroids[top]).norm();
                    da.total_cmp(&db)
                })
                .unwrap_or_default();
            order[number - 1] = top;
            order[sides - number] = opposite;
        }

        let mut faces = Vec::with_capacity(sides);
        for (index, &blank_face) in order.iter().enumerate() {
            let up = if blank_face >= half {
                Vector3::y()
            } else {
                -Vector3::y()
            };
            let legend = if self.tens {
                pick_for_doubles_by_index(index)
            } else {
                pick_for_number(index, sides)
            };
            faces.push(face_from_blank(&blank, blank_face, up, true, legend)?);
        }

        Ok(DieShape {
            name: blank.name,
            face_to_face: face_to_face(&faces),
            faces,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::DiceError;
    use crate::legend::Legend;

    #[test]
    fn d10_is_a_pentagonal_trapezohedron() {
        let die = TrapezohedronDie::new("d10_trapezohedron", "D10", 10);
        let shape = die.build(&DieParams::new()).unwrap();
        assert_eq!(shape.name, "Pentagonal Trapezohedron");
        assert_eq!(shape.faces.len(), 10);
        assert_eq!(shape.faces[9].default_legend, Legend::ZERO);
        assert_eq!(shape.faces[0].outline.points(1).len(), 4);
    }

    #[test]
    fn opposite_faces_sum_to_sides_plus_one() {
        for sides in [6, 8, 10, 12] {
            let die = TrapezohedronDie::new("t", "T", sides);
            let shape = die.build(&DieParams::new()).unwrap();
            for number in 1..=sides {
                let a = shape.faces[number - 1].placement.rotation * Vector3::z();
                let b = shape.faces[sides - number].placement.rotation * Vector3::z();
                assert_relative_eq!(a.dot(&b), -1.0, epsilon = 1e-9);
            }
            for i in 0..sides {
                for j in i + 1..sides {
                    let gap = shape.faces[i].placement.translation.vector
                        - shape.faces[j].placement.translation.vector;
                    assert!(gap.norm() > 1e-6, "faces {i} and {j} coincide");
                }
            }
        }
    }

    #[test]
    fn even_halves_are_dipyramids() {
        let die = TrapezohedronDie::new("d8_trapezohedron", "D8", 8);
        let shape = die.build(&DieParams::new()).unwrap();
        assert_eq!(shape.name, "Square Dipyramid");
    }

    #[test]
    fn odd_face_counts_are_rejected() {
        let err = TrapezohedronDie::new("t", "T", 9)
            .build(&DieParams::new())
            .unwrap_err();
        assert!(matches!(
            err,
            DiceError::Construction(ConstructionError::InvalidSideCount { sides: 9, .. })
        ));
        assert!(TrapezohedronDie::new("t", "T", 4).build(&DieParams::new()).is_err());
    }
}
