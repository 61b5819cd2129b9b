use std::f64::consts::TAU;

use tracing::debug;

use crate::blank::{crystal, CrystalParams};
use crate::error::Result;
use crate::legend::{pick_for_doubles_by_index, pick_for_number, Legend};
use crate::math::Vector3;

use super::{face_from_blank, face_to_face, ring_slots, Dial, DieModel, DieParams, DieShape};

const DIALS: [Dial; 4] = [
    Dial {
        id: "crystal_radius",
        name: "Radius",
        description: "Distance from the axis to the widest corners",
        default: 8.0,
        min: 3.0,
        max: 60.0,
        step: 0.5,
    },
    Dial {
        id: "crystal_main_height",
        name: "Body Height",
        description: "Length of the numbered half",
        default: 16.0,
        min: 2.0,
        max: 60.0,
        step: 0.5,
    },
    Dial {
        id: "crystal_cap_height",
        name: "Cap Height",
        description: "Length of the blank half",
        default: 4.0,
        min: 1.0,
        max: 30.0,
        step: 0.2,
    },
    Dial {
        id: "crystal_twist",
        name: "Twist",
        description: "Rotation of the cap against the body, in sides",
        default: 0.5,
        min: 0.0,
        max: 0.98,
        step: 0.02,
    },
];

/// An uneven dipyramid numbered on its long half.
#[derive(Debug, Clone, Copy)]
pub struct CrystalDie {
    id: &'static str,
    name: &'static str,
    sides: usize,
    tens: bool,
}

impl CrystalDie {
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

impl DieModel for CrystalDie {
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
        let [radius, main, cap, twist] = DIALS.map(|d| params.value(&d));
        #[allow(clippy::cast_precision_loss)]
        let side_angle = TAU / self.sides as f64;
        let blank = crystal(&CrystalParams {
            sides: self.sides,
            radius,
            cap_height: cap,
            main_height: main,
            twist: side_angle * twist,
        })?;
        debug!(die = self.id, blank = %blank.name, "built crystal blank");

        let mut faces = Vec::with_capacity(blank.face_count());
        for (index, slot) in ring_slots(self.sides).into_iter().enumerate() {
            let legend = if self.tens {
                pick_for_doubles_by_index(index)
            } else {
                pick_for_number(index, self.sides)
            };
            faces.push(face_from_blank(&blank, slot, Vector3::y(), true, legend)?);
        }
        let face_to_face = face_to_face(&faces);
        for cap in self.sides..blank.face_count() {
            faces.push(face_from_blank(&blank, cap, -Vector3::y(), false, Legend::BLANK)?);
        }

        Ok(DieShape {
            name: blank.name,
            faces,
            face_to_face,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn crystal_d6_faces() {
        let die = CrystalDie::new("d6_crystal", "D6 Crystal", 6);
        let shape = die.build(&DieParams::new()).unwrap();
        assert_eq!(shape.name, "Uneven Hexagonal Trapezohedron");
        assert_eq!(shape.faces.len(), 12);
        assert!(shape.faces[..6].iter().all(|f| f.is_number_face));
        assert_eq!(shape.faces[5].default_legend, Legend::SIX);
        assert!(shape.faces[6..].iter().all(|f| f.default_legend.is_blank()));
        for face in &shape.faces[..6] {
            let normal = face.placement.rotation * Vector3::z();
            assert!(normal.y < 0.0);
        }
        assert!(shape.face_to_face > 0.0);
    }

    #[test]
    fn untwisted_crystal_is_a_dipyramid() {
        let die = CrystalDie::new("d4_crystal", "D4 Crystal", 4);
        let shape = die
            .build(&DieParams::new().with("crystal_twist", 0.0))
            .unwrap();
        assert_eq!(shape.name, "Uneven Square Dipyramid");
        assert_eq!(shape.faces[0].outline.points(1).len(), 3);
    }
}
