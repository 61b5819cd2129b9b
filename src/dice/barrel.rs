use tracing::debug;

use crate::blank::{barrel, BarrelParams};
use crate::error::Result;
use crate::legend::{pick_for_doubles_by_index, pick_for_number, Legend};
use crate::math::Vector3;

use super::{face_from_blank, face_to_face, ring_slots, Dial, DieModel, DieParams, DieShape};

const DIALS: [Dial; 4] = [
    Dial {
        id: "barrel_width",
        name: "Diameter",
        description: "Diameter of the barrel",
        default: 14.0,
        min: 1.0,
        max: 100.0,
        step: 0.1,
    },
    Dial {
        id: "barrel_cap_height",
        name: "Cap Height",
        description: "Height of the caps",
        default: 6.0,
        min: 0.1,
        max: 100.0,
        step: 0.1,
    },
    Dial {
        id: "barrel_main_height",
        name: "Body Height",
        description: "Length of the main barrel",
        default: 16.0,
        min: 1.0,
        max: 100.0,
        step: 0.1,
    },
    Dial {
        id: "barrel_twist",
        name: "Twist",
        description: "How much to twist the caps",
        default: 0.5,
        min: 0.0,
        max: 1.0,
        step: 0.05,
    },
];

/// A prism die with pyramidal caps, numbered around its body.
#[derive(Debug, Clone, Copy)]
pub struct BarrelDie {
    id: &'static str,
    name: &'static str,
    sides: usize,
    tens: bool,
}

impl BarrelDie {
    #[must_use]
    pub const fn new(id: &'static str, name: &'static str, sides: usize) -> Self {
        Self {
            id,
            name,
            sides,
            tens: false,
        }
    }

    /// A percentile variant showing 10, 20, ..., 00.
    #[must_use]
    pub const fn tens(mut self) -> Self {
        self.tens = true;
        self
    }

    fn legend(&self, index: usize) -> Legend {
        if self.tens {
            pick_for_doubles_by_index(index)
        } else {
            pick_for_number(index, self.sides)
        }
    }
}

impl DieModel for BarrelDie {
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
        let [width, cap, main, twist] = DIALS.map(|d| params.value(&d));
        let blank = barrel(&BarrelParams {
            sides: self.sides,
            radius: width / 2.0,
            cap_height: cap,
            main_height: main,
            twist,
        })?;
        debug!(die = self.id, blank = %blank.name, "built barrel blank");

        let mut faces = Vec::with_capacity(blank.face_count());
        for (index, slot) in ring_slots(self.sides).into_iter().enumerate() {
            faces.push(face_from_blank(
                &blank,
                slot,
                Vector3::y(),
                true,
                self.legend(index),
            )?);
        }
        let face_to_face = face_to_face(&faces);
        for cap in self.sides..blank.face_count() {
            faces.push(face_from_blank(&blank, cap, Vector3::y(), false, Legend::BLANK)?);
        }

        Ok(DieShape {
            name: blank.name,
            faces,
            face_to_face,
        })
    }
}
