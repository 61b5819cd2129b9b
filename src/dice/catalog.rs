use crate::error::{ConstructionError, Result};

use super::{
    BarrelDie, CrystalDie, Dial, DieModel, DieParams, DieShape, Polyhedron, PolyhedronDie,
    RhombicDie, TrapezohedronDie,
};

/// Any of the built-in die models.
#[derive(Debug, Clone, Copy)]
pub enum DieKind {
    Barrel(BarrelDie),
    Crystal(CrystalDie),
    Trapezohedron(TrapezohedronDie),
    Rhombic(RhombicDie),
    Polyhedron(PolyhedronDie),
}

/// Every built-in die.
pub const ALL_DICE: [DieKind; 21] = [
    DieKind::Barrel(BarrelDie::new("d4_barrel", "D4 Barrel", 4)),
    DieKind::Barrel(BarrelDie::new("d6_barrel", "D6 Barrel", 6)),
    DieKind::Barrel(BarrelDie::new("d8_barrel", "D8 Barrel", 8)),
    DieKind::Barrel(BarrelDie::new("d10_barrel", "D10 Barrel", 10)),
    DieKind::Barrel(BarrelDie::new("d00_barrel", "D% Barrel", 10).tens()),
    DieKind::Barrel(BarrelDie::new("d12_barrel", "D12 Barrel", 12)),
    DieKind::Crystal(CrystalDie::new("d4_crystal", "D4 Crystal", 4)),
    DieKind::Crystal(CrystalDie::new("d6_crystal", "D6 Crystal", 6)),
    DieKind::Crystal(CrystalDie::new("d8_crystal", "D8 Crystal", 8)),
    DieKind::Crystal(CrystalDie::new("d10_crystal", "D10 Crystal", 10)),
    DieKind::Crystal(CrystalDie::new("d00_crystal", "D% Crystal", 10).tens()),
    DieKind::Crystal(CrystalDie::new("d12_crystal", "D12 Crystal", 12)),
    DieKind::Trapezohedron(TrapezohedronDie::new("d6_trapezohedron", "D6 Rhombohedron", 6)),
    DieKind::Trapezohedron(TrapezohedronDie::new("d8_trapezohedron", "D8 Dipyramid", 8)),
    DieKind::Trapezohedron(TrapezohedronDie::new("d10_trapezohedron", "D10", 10)),
    DieKind::Trapezohedron(TrapezohedronDie::new("d00_trapezohedron", "D%", 10).tens()),
    DieKind::Trapezohedron(TrapezohedronDie::new("d12_trapezohedron", "D12 Dipyramid", 12)),
    DieKind::Rhombic(RhombicDie),
    DieKind::Polyhedron(PolyhedronDie::new("d6_cube", "D6", Polyhedron::Cube)),
    DieKind::Polyhedron(PolyhedronDie::new(
        "d12_dodecahedron",
        "D12",
        Polyhedron::Dodecahedron,
    )),
    DieKind::Polyhedron(PolyhedronDie::new(
        "d20_icosahedron",
        "D20",
        Polyhedron::Icosahedron,
    )),
];

impl DieKind {
    /// Looks up a built-in die by its id.
    ///
    /// # Errors
    ///
    /// Returns `ConstructionError::UnknownDie` for an unrecognised id.
    pub fn from_id(id: &str) -> Result<Self> {
        ALL_DICE
            .iter()
            .find(|die| die.id() == id)
            .copied()
            .ok_or_else(|| ConstructionError::UnknownDie(id.to_string()).into())
    }

    fn model(&self) -> &dyn DieModel {
        match self {
            Self::Barrel(die) => die,
            Self::Crystal(die) => die,
            Self::Trapezohedron(die) => die,
            Self::Rhombic(die) => die,
            Self::Polyhedron(die) => die,
        }
    }
}

impl DieModel for DieKind {
    fn id(&self) -> &'static str {
        self.model().id()
    }

    fn name(&self) -> &'static str {
        self.model().name()
    }

    fn dials(&self) -> &[Dial] {
        self.model().dials()
    }

    fn build(&self, params: &DieParams) -> Result<DieShape> {
        self.model().build(params)
    }
}
