//! Platonic dice laid out face by face from closed-form data instead of CSG.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::Shape;
use crate::legend::pick_for_number;
use crate::math::{Isometry3, Point2, Rotation3, Vector3};

use super::{Dial, DieModel, DieParams, DieShape, Face};

const PHI: f64 = 1.618_033_988_749_895;

const DIALS: [Dial; 1] = [Dial {
    id: "polyhedron_size",
    name: "Size",
    description: "Distance between opposite faces",
    default: 18.0,
    min: 6.0,
    max: 60.0,
    step: 0.5,
}];

/// Splits faces into two opposite halves; no face normal is perpendicular to it.
fn hemisphere() -> Vector3 {
    Vector3::new(0.31, 0.52, 0.79)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polyhedron {
    Cube,
    Dodecahedron,
    Icosahedron,
}

impl Polyhedron {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cube => "Cube",
            Self::Dodecahedron => "Dodecahedron",
            Self::Icosahedron => "Icosahedron",
        }
    }

    /// Corners of one face.
    #[must_use]
    pub fn corners(self) -> usize {
        match self {
            Self::Cube => 4,
            Self::Dodecahedron => 5,
            Self::Icosahedron => 3,
        }
    }

    /// Edge length for a given distance between opposite faces.
    #[must_use]
    pub fn edge(self, face_to_face: f64) -> f64 {
        match self {
            Self::Cube => face_to_face,
            Self::Dodecahedron => face_to_face * (3.0 - PHI).sqrt() / (PHI * PHI),
            Self::Icosahedron => 3f64.sqrt() * face_to_face / (PHI * PHI),
        }
    }

    /// Angle of the first outline corner past +Y. Squares start half a step
    /// round so an edge, not a corner, sits on top.
    #[must_use]
    pub fn start_angle(self) -> f64 {
        match self {
            Self::Cube => PI / 4.0,
            Self::Dodecahedron | Self::Icosahedron => 0.0,
        }
    }

    /// The face outline: a clockwise regular polygon whose first corner sits
    /// [`Self::start_angle`] anticlockwise of +Y.
    #[must_use]
    pub fn face_outline(self, face_to_face: f64) -> Vec<Point2> {
        let k = self.corners();
        #[allow(clippy::cast_precision_loss)]
        let (kf, radius) = (k as f64, self.edge(face_to_face) / (2.0 * (PI / k as f64).sin()));
        (0..k)
            .map(|j| {
                #[allow(clippy::cast_precision_loss)]
                let angle = FRAC_PI_2 + self.start_angle() - TAU * j as f64 / kf;
                Point2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }

    /// Corners of the solid at an arbitrary scale.
    fn vertices(self) -> Vec<Vector3> {
        match self {
            Self::Cube => signed(&[[1.0, 1.0, 1.0]]),
            Self::Dodecahedron => dodecahedron_vertices(),
            Self::Icosahedron => signed(&cyclic([0.0, 1.0, PHI])),
        }
    }

    /// Unit face normals: the vertex directions of the dual solid.
    fn normals(self) -> Vec<Vector3> {
        let dual = match self {
            Self::Cube => signed(&cyclic([1.0, 0.0, 0.0])),
            Self::Dodecahedron => signed(&cyclic([0.0, PHI, 1.0])),
            Self::Icosahedron => {
                let mut out = signed(&[[1.0, 1.0, 1.0]]);
                out.extend(signed(&cyclic([0.0, PHI, 1.0 / PHI])));
                out
            }
        };
        dual.into_iter().map(|v| v.normalize()).collect()
    }
}

fn cyclic(v: [f64; 3]) -> [[f64; 3]; 3] {
    [v, [v[1], v[2], v[0]], [v[2], v[0], v[1]]]
}

/// Every sign combination of each base vector, without duplicates.
fn signed(bases: &[[f64; 3]]) -> Vec<Vector3> {
    let mut out: Vec<Vector3> = Vec::new();
    for base in bases {
        for bits in 0..8u8 {
            let sign = |i: u8| if bits & (1 << i) == 0 { 1.0 } else { -1.0 };
            let v = Vector3::new(base[0] * sign(0), base[1] * sign(1), base[2] * sign(2));
            if !out.iter().any(|u| (u - v).norm() < 1e-12) {
                out.push(v);
            }
        }
    }
    out
}

fn dodecahedron_vertices() -> Vec<Vector3> {
    let mut out = signed(&[[1.0, 1.0, 1.0]]);
    out.extend(signed(&cyclic([0.0, 1.0 / PHI, PHI])));
    out
}

/// The direction a legend on a face with this normal should read up:
/// world +Y in the face plane, or away from the viewer on level faces.
fn reading_up(normal: &Vector3) -> Vector3 {
    let up = Vector3::y() - normal * normal.y;
    if up.norm() > 1e-6 {
        up
    } else {
        -Vector3::z()
    }
}

/// A cube, dodecahedron or icosahedron die.
#[derive(Debug, Clone, Copy)]
pub struct PolyhedronDie {
    id: &'static str,
    name: &'static str,
    kind: Polyhedron,
}

impl PolyhedronDie {
    #[must_use]
    pub const fn new(id: &'static str, name: &'static str, kind: Polyhedron) -> Self {
        Self { id, name, kind }
    }

    /// Placements of every face, opposite faces at `i` and `n - 1 - i`.
    ///
    /// Each placement swings local +Z onto the face normal, after a spin about
    /// local Z. This is the same composition as a Z pre-rotation followed by
    /// one or two axis/angle turns, solved per face instead of tabulated. The
    /// spin is a multiple of the corner step away from the one that lands
    /// corner 0 on a solid vertex, picked so the outline's +Y comes closest to
    /// [`reading_up`].
    fn placements(&self, face_to_face: f64) -> Result<Vec<Isometry3>> {
        let half_distance = face_to_face / 2.0;
        let normals = self.kind.normals();
        let mut vertices = self.kind.vertices();
        let inradius = normals
            .first()
            .map(|n| vertices.iter().map(|v| v.dot(n)).fold(f64::MIN, f64::max))
            .ok_or_else(|| GeometryError::Degenerate("polyhedron has no faces".into()))?;
        for v in &mut vertices {
            *v *= half_distance / inradius;
        }

        let pole = hemisphere();
        let upper: Vec<Vector3> = normals
            .into_iter()
            .filter(|n| n.dot(&pole) > 0.0)
            .collect();
        let ordered = upper
            .iter()
            .copied()
            .chain(upper.iter().rev().map(|n| -n));

        #[allow(clippy::cast_precision_loss)]
        let step = TAU / self.kind.corners() as f64;
        let first_corner = FRAC_PI_2 + self.kind.start_angle();
        ordered
            .map(|normal| -> Result<Isometry3> {
                let centre = normal * half_distance;
                let swing = Rotation3::rotation_between(&Vector3::z(), &normal)
                    .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));
                let corner = vertices
                    .iter()
                    .find(|v| v.dot(&normal) > half_distance * (1.0 - 1e-9))
                    .ok_or_else(|| GeometryError::Degenerate("face without corners".into()))?;
                let local = swing.inverse_transform_vector(&(corner - centre));
                let aligned = local.y.atan2(local.x) - first_corner;
                let up = swing.inverse_transform_vector(&reading_up(&normal));
                let upright = up.y.atan2(up.x) - FRAC_PI_2;
                let spin = aligned + ((upright - aligned) / step).round() * step;
                let rotation = swing * Rotation3::from_axis_angle(&Vector3::z_axis(), spin);
                Ok(Isometry3::from_parts(centre.into(), rotation))
            })
            .collect()
    }
}

impl DieModel for PolyhedronDie {
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
        let size = params.value(&DIALS[0]);
        let outline = Shape::from_points(&self.kind.face_outline(size));
        let placements = self.placements(size)?;
        debug!(die = self.id, faces = placements.len(), size, "laid out polyhedron");

        let count = placements.len();
        let faces = placements
            .into_iter()
            .enumerate()
            .map(|(i, placement)| Face {
                outline: outline.clone(),
                is_number_face: true,
                default_legend: pick_for_number(i, count),
                placement,
            })
            .collect();

        Ok(DieShape {
            name: self.kind.name().to_string(),
            faces,
            face_to_face: size,
        })
    }
}
