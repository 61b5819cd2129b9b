//! Die models: dials, face lists and default legends for each die kind.

mod barrel;
mod catalog;
mod crystal;
mod params;
mod polyhedron;
mod rhombic;
mod trapezohedron;

pub use barrel::BarrelDie;
pub use catalog::{DieKind, ALL_DICE};
pub use crystal::CrystalDie;
pub use params::{Dial, DieParams, FaceParams, ENGRAVING_DEPTH};
pub use polyhedron::{Polyhedron, PolyhedronDie};
pub use rhombic::RhombicDie;
pub use trapezohedron::TrapezohedronDie;

use crate::blank::Blank;
use crate::error::Result;
use crate::geometry::Shape;
use crate::legend::Legend;
use crate::math::{Isometry3, Point2, Vector3};

/// One flat facet of a die, laid out in its own +Z-facing frame.
#[derive(Debug, Clone)]
pub struct Face {
    /// Convex, clockwise outline centred near the origin.
    pub outline: Shape,
    pub is_number_face: bool,
    pub default_legend: Legend,
    /// Moves geometry from the face frame onto the solid.
    pub placement: Isometry3,
}

/// Everything a die model produces from one set of parameters.
#[derive(Debug, Clone)]
pub struct DieShape {
    pub name: String,
    pub faces: Vec<Face>,
    /// Distance between opposite numbered faces.
    pub face_to_face: f64,
}

impl DieShape {
    /// The first numbered face, used to size legends for the whole die.
    #[must_use]
    pub fn first_number_face(&self) -> Option<&Face> {
        self.faces.iter().find(|f| f.is_number_face)
    }
}

/// A parametric die.
pub trait DieModel {
    /// Stable identifier, e.g. `d6_barrel`.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Dials this model reads. The engraving depth is implied.
    fn dials(&self) -> &[Dial];

    /// Builds the die's faces from (already simplified) parameters.
    ///
    /// # Errors
    ///
    /// Returns a construction error if the solid cannot be built.
    fn build(&self, params: &DieParams) -> Result<DieShape>;
}

/// Lifts face `index` of `blank` into a [`Face`].
///
/// `up` is the direction the legend's top should point along.
pub(crate) fn face_from_blank(
    blank: &Blank,
    index: usize,
    up: Vector3,
    is_number_face: bool,
    default_legend: Legend,
) -> Result<Face> {
    let projection = blank.project_face(index, up)?;
    let clockwise: Vec<Point2> = projection.outline.iter().rev().copied().collect();
    Ok(Face {
        outline: Shape::from_points(&clockwise),
        is_number_face,
        default_legend,
        placement: projection.placement(),
    })
}

/// Twice the smallest distance from the origin to any of the given faces.
pub(crate) fn face_to_face(faces: &[Face]) -> f64 {
    faces
        .iter()
        .map(|f| {
            let normal = f.placement.rotation * Vector3::z();
            f.placement.translation.vector.dot(&normal).abs()
        })
        .fold(f64::INFINITY, f64::min)
        * 2.0
}

/// Slot in the odd-number pattern used by ring numbering: 1 sits at slot 0
/// and later odd numbers alternate right and left of it.
fn odd_slot(number: usize, ring: usize) -> usize {
    let u = (number - 1) / 2;
    let x = (u + u % 2) / 2;
    if u % 2 == 1 {
        x % ring
    } else {
        (ring - x % ring) % ring
    }
}

/// Ring positions for the numbers `1..=ring` on a ring of faces, ordered
/// by azimuth.
///
/// For an even ring, odd numbers fan out from slot 0 and each even number
/// sits opposite the odd number it sums to `ring + 1` with. Odd rings are
/// numbered in order.
#[must_use]
pub fn ring_slots(ring: usize) -> Vec<usize> {
    if ring % 2 == 1 {
        return (0..ring).collect();
    }
    (1..=ring)
        .map(|number| {
            if number % 2 == 1 {
                odd_slot(number, ring)
            } else {
                (odd_slot(ring + 1 - number, ring) + ring / 2) % ring
            }
        })
        .collect()
}

/// Top-ring positions for the odd numbers `1, 3, ..., 2 * ring - 1` of a
/// two-ring die.
#[must_use]
pub fn top_ring_slots(ring: usize) -> Vec<usize> {
    (0..ring).map(|k| odd_slot(2 * k + 1, ring)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_permutation(mut slots: Vec<usize>) {
        let n = slots.len();
        slots.sort_unstable();
        assert_eq!(slots, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn even_rings_are_numbered_with_opposites() {
        for ring in [4, 6, 8, 10, 12] {
            let slots = ring_slots(ring);
            assert_permutation(slots.clone());
            for number in 1..=ring {
                let opposite = ring + 1 - number;
                let gap = (slots[number - 1] + ring - slots[opposite - 1]) % ring;
                assert_eq!(gap, ring / 2, "ring {ring}, number {number}");
            }
        }
        assert_eq!(ring_slots(6), vec![0, 2, 1, 4, 5, 3]);
    }

    #[test]
    fn odd_rings_are_numbered_in_order() {
        assert_eq!(ring_slots(5), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn top_ring_slots_are_distinct() {
        for ring in 3..=10 {
            assert_permutation(top_ring_slots(ring));
        }
        assert_eq!(top_ring_slots(5), vec![0, 1, 4, 2, 3]);
    }
}
