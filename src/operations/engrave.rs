use crate::error::{OperationError, Result};
use crate::geometry::{Shape, DEFAULT_DIVISIONS};
use crate::math::polygon_2d::{is_clockwise, signed_area};
use crate::math::{Point2, Point3};
use crate::operations::planar::{contained, polygon_contains_polygon, Placement};
use crate::tessellation::{TriangleMesh, TriangulatePolygon};

/// Height of the diagnostic symbol copy above the face.
pub const SYMBOL_LIFT: f64 = 0.1;

/// Role of a piece of engraved face geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The face surface with symbol-shaped openings.
    Front,
    /// Walls joining the face surface to the recessed floor.
    Walls,
    /// The recessed floor of the symbols.
    Engraved,
    /// Symbol outline lifted above the face, for display only.
    Symbol,
}

impl Part {
    /// Whether this part belongs in an exported solid.
    #[must_use]
    pub fn is_solid(self) -> bool {
        !matches!(self, Part::Symbol)
    }
}

/// A sampled polygon with holes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub outer: Vec<Point2>,
    pub holes: Vec<Vec<Point2>>,
}

impl Region {
    fn new(outer: Vec<Point2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    fn area(&self) -> f64 {
        signed_area(&self.outer).abs()
    }

    fn triangulate(&self, z: f64) -> Result<TriangleMesh> {
        TriangulatePolygon::new(&self.outer, &self.holes)
            .at_z(z)
            .execute()
    }
}

/// The face surface after symbol outlines have been cut into it.
///
/// A symbol hole is filled back in as an island; a later symbol that sits
/// inside that hole becomes a hole of the island instead of the face.
#[derive(Debug, Clone, Default)]
pub struct NestedRegions {
    pub face: Region,
    pub islands: Vec<Region>,
    /// Every symbol boundary, oriented so the wall built on it faces the cavity.
    pub loops: Vec<Vec<Point2>>,
}

/// One mesh of an engraved face, tagged with its role.
#[derive(Debug, Clone)]
pub struct EngravedPart {
    pub part: Part,
    pub mesh: TriangleMesh,
}

/// Engraved geometry of one face, in the face's local +Z-up frame.
#[derive(Debug, Clone, Default)]
pub struct EngravedFace {
    pub parts: Vec<EngravedPart>,
    /// False when the legend did not fit and the face was left blank.
    pub fits: bool,
}

impl EngravedFace {
    #[must_use]
    pub fn part(&self, part: Part) -> Option<&TriangleMesh> {
        self.parts.iter().find(|p| p.part == part).map(|p| &p.mesh)
    }

    /// All parts that make up the printable surface, merged.
    #[must_use]
    pub fn solid_mesh(&self) -> TriangleMesh {
        let mut mesh = TriangleMesh::default();
        for p in self.parts.iter().filter(|p| p.part.is_solid()) {
            mesh.merge(&p.mesh);
        }
        mesh
    }
}

/// Engraves a legend into a convex, clockwise face outline.
///
/// Symbols are expected centred on the origin; the placement is applied as
/// scale, then rotation, then offset.
pub struct Engrave<'a> {
    outline: &'a Shape,
    symbols: &'a [Shape],
    placement: Placement,
    depth: f64,
    divisions: usize,
}

impl<'a> Engrave<'a> {
    /// Creates a new `Engrave` operation.
    #[must_use]
    pub fn new(outline: &'a Shape, symbols: &'a [Shape]) -> Self {
        Self {
            outline,
            symbols,
            placement: Placement::default(),
            depth: 0.8,
            divisions: DEFAULT_DIVISIONS,
        }
    }

    #[must_use]
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.divisions = divisions;
        self
    }

    /// Executes the engraving.
    ///
    /// A legend that does not fit is not an error: the result holds the
    /// unbroken face plus the diagnostic symbol part, with `fits` cleared.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive depth and
    /// `TessellationError::Failed` if symbols overlap each other.
    pub fn execute(&self) -> Result<EngravedFace> {
        if self.depth.is_nan() || self.depth <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "engraving depth must be positive, got {}",
                self.depth
            ))
            .into());
        }

        let face = Region::new(self.outline.points(self.divisions));
        if self.symbols.is_empty() {
            return Ok(EngravedFace {
                parts: vec![EngravedPart {
                    part: Part::Front,
                    mesh: face.triangulate(0.0)?,
                }],
                fits: true,
            });
        }

        let symbols = self.placement.apply(self.symbols);
        let fits = contained(self.outline, &symbols);
        let symbol_part = EngravedPart {
            part: Part::Symbol,
            mesh: self.triangulate_symbols(&symbols, SYMBOL_LIFT)?,
        };

        if !fits {
            return Ok(EngravedFace {
                parts: vec![
                    EngravedPart {
                        part: Part::Front,
                        mesh: face.triangulate(0.0)?,
                    },
                    symbol_part,
                ],
                fits,
            });
        }

        let nested = nest(face, &symbols, self.divisions);

        let mut front = nested.face.triangulate(0.0)?;
        for island in &nested.islands {
            front.merge(&island.triangulate(0.0)?);
        }

        Ok(EngravedFace {
            parts: vec![
                EngravedPart {
                    part: Part::Walls,
                    mesh: walls(&nested.loops, self.depth),
                },
                EngravedPart {
                    part: Part::Engraved,
                    mesh: self.triangulate_symbols(&symbols, -self.depth)?,
                },
                EngravedPart {
                    part: Part::Front,
                    mesh: front,
                },
                symbol_part,
            ],
            fits,
        })
    }

    fn triangulate_symbols(&self, symbols: &[Shape], z: f64) -> Result<TriangleMesh> {
        let mut mesh = TriangleMesh::default();
        for s in symbols {
            let region = Region {
                outer: s.points(self.divisions),
                holes: s.hole_points(self.divisions),
            };
            mesh.merge(&region.triangulate(z)?);
        }
        Ok(mesh)
    }
}

/// Cuts already-placed symbols into `face`, largest first.
#[must_use]
pub fn nest(mut face: Region, symbols: &[Shape], divisions: usize) -> NestedRegions {
    let mut ordered: Vec<(f64, &Shape)> = symbols.iter().map(|s| (s.area(divisions), s)).collect();
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut islands: Vec<Region> = Vec::new();
    let mut loops = Vec::new();

    for (_, symbol) in ordered {
        let mut outline = symbol.points(divisions);
        if is_clockwise(&outline) {
            outline.reverse();
        }

        let host = islands
            .iter()
            .enumerate()
            .filter(|(_, island)| polygon_contains_polygon(&island.outer, &outline))
            .min_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
            .map(|(i, _)| i);
        match host {
            Some(i) => islands[i].holes.push(outline.clone()),
            None => face.holes.push(outline.clone()),
        }
        loops.push(outline);

        for mut hole in symbol.hole_points(divisions) {
            if !is_clockwise(&hole) {
                hole.reverse();
            }
            loops.push(hole.clone());
            islands.push(Region::new(hole));
        }
    }

    NestedRegions {
        face,
        islands,
        loops,
    }
}

/// Side walls of the symbol cavities, two triangles per boundary edge.
fn walls(loops: &[Vec<Point2>], depth: f64) -> TriangleMesh {
    let mut triangles = Vec::new();
    for ring in loops {
        let n = ring.len();
        for i in 0..n {
            let (p, q) = (ring[i], ring[(i + 1) % n]);
            let a = Point3::new(p.x, p.y, 0.0);
            let b = Point3::new(q.x, q.y, 0.0);
            let c = Point3::new(q.x, q.y, -depth);
            let d = Point3::new(p.x, p.y, -depth);
            triangles.push([a, b, c]);
            triangles.push([c, d, a]);
        }
    }
    let mut mesh = TriangleMesh::from_triangles(triangles);
    mesh.compute_vertex_normals();
    mesh
}
