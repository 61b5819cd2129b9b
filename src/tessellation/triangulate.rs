use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::FixedFaceHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, TessellationError};
use crate::math::{Point2, Point3, Vector3};

use super::TriangleMesh;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Triangulates a planar polygon with holes in the local XY plane.
///
/// Triangles wind counter-clockwise seen from +Z regardless of the input
/// loops' winding; the filled region follows the even-odd rule.
pub struct TriangulatePolygon<'a> {
    boundary: &'a [Point2],
    holes: &'a [Vec<Point2>],
    z: f64,
}

impl<'a> TriangulatePolygon<'a> {
    /// Creates a new `TriangulatePolygon` operation.
    #[must_use]
    pub fn new(boundary: &'a [Point2], holes: &'a [Vec<Point2>]) -> Self {
        Self {
            boundary,
            holes,
            z: 0.0,
        }
    }

    /// Places the output at height `z` instead of zero.
    #[must_use]
    pub fn at_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// Executes the triangulation.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::Failed` if a loop has fewer than three
    /// points, a point cannot be inserted, or two loops intersect.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let mut cdt = Cdt::new();
        insert_constraint_loop(&mut cdt, self.boundary)?;
        for hole in self.holes {
            insert_constraint_loop(&mut cdt, hole)?;
        }

        let interior_faces = classify_interior_faces(&cdt);

        let mut mesh = TriangleMesh::default();
        let mut vertex_map: HashMap<usize, u32> = HashMap::new();

        for face_handle in cdt.inner_faces() {
            if !interior_faces.contains(&face_handle.fix().index()) {
                continue;
            }

            let verts = face_handle.vertices();
            let mut tri_indices = [0u32; 3];
            for (i, vh) in verts.iter().enumerate() {
                let idx = vh.fix().index();
                tri_indices[i] = *vertex_map.entry(idx).or_insert_with(|| {
                    let pos = vh.position();
                    mesh.vertices.push(Point3::new(pos.x, pos.y, self.z));
                    mesh.normals.push(Vector3::z());
                    (mesh.vertices.len() - 1) as u32
                });
            }

            let [a, b, c] = tri_indices.map(|i| mesh.vertices[i as usize]);
            if (b - a).cross(&(c - a)).z < 0.0 {
                tri_indices.swap(1, 2);
            }
            mesh.indices.push(tri_indices);
        }

        Ok(mesh)
    }
}

/// Inserts a closed polyline as constraint edges into a CDT.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[Point2]) -> Result<()> {
    if points.len() < 3 {
        return Err(
            TessellationError::Failed("constraint loop needs at least 3 points".into()).into(),
        );
    }

    let mut handles = Vec::with_capacity(points.len());
    for p in points {
        let h = cdt
            .insert(SpadePoint2::new(p.x, p.y))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from == to {
            continue;
        }
        if !cdt.can_add_constraint(from, to) {
            return Err(
                TessellationError::Failed("polygon boundaries intersect".into()).into(),
            );
        }
        cdt.add_constraint(from, to);
    }

    Ok(())
}

/// Classifies which inner faces of the CDT are inside the polygon using flood-fill.
///
/// Crossing a constraint edge flips inside/outside, so faces at odd depth
/// from the outer face are interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbor) = edge.rev().face().as_inner() else {
                continue;
            };
            let n_idx = neighbor.fix().index();
            if depth_map.contains_key(&n_idx) {
                continue;
            }
            let new_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(n_idx, new_depth);
            if new_depth % 2 == 1 {
                interior.insert(n_idx);
            }
            queue.push_back((neighbor.fix(), new_depth));
        }
    }

    interior
}

/// Fans a convex loop from its first vertex: `n - 2` triangles.
#[must_use]
pub fn fan(boundary: &[Point3]) -> Vec<[Point3; 3]> {
    (1..boundary.len().saturating_sub(1))
        .map(|i| [boundary[0], boundary[i], boundary[i + 1]])
        .collect()
}

/// Fans a convex loop from its centroid: `n` triangles.
#[must_use]
pub fn centroid_fan(boundary: &[Point3]) -> Vec<[Point3; 3]> {
    let n = boundary.len();
    if n < 3 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let center = Point3::from(
        boundary
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / n as f64,
    );
    (0..n)
        .map(|i| [center, boundary[i], boundary[(i + 1) % n]])
        .collect()
}
