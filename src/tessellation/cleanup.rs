use std::collections::{HashMap, HashSet};

use crate::math::Point3;

use super::TriangleMesh;

/// An edge shared by other than exactly two triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct BadEdge {
    pub from: Point3,
    pub to: Point3,
    /// Number of triangles using the edge.
    pub uses: usize,
}

/// Merges vertices closer than `tolerance` and drops triangles that collapse.
///
/// Vertex normals are recomputed on the welded mesh.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn weld(mesh: &TriangleMesh, tolerance: f64) -> TriangleMesh {
    let mut out = TriangleMesh::default();
    let mut lookup: HashMap<[i64; 3], u32> = HashMap::new();
    let mut remap = Vec::with_capacity(mesh.vertices.len());

    for p in &mesh.vertices {
        let key = quantize(p, tolerance);
        let idx = *lookup.entry(key).or_insert_with(|| {
            out.vertices.push(*p);
            (out.vertices.len() - 1) as u32
        });
        remap.push(idx);
    }

    for tri in &mesh.indices {
        let [a, b, c] = tri.map(|i| remap[i as usize]);
        if a == b || b == c || c == a {
            continue;
        }
        out.indices.push([a, b, c]);
    }

    out.compute_vertex_normals();
    out
}

/// Drops triangles that use the same three vertices as an earlier one.
#[must_use]
pub fn remove_duplicate_triangles(mesh: &TriangleMesh) -> TriangleMesh {
    let mut seen: HashSet<[u32; 3]> = HashSet::new();
    let mut out = mesh.clone();
    out.indices.retain(|tri| {
        let mut key = *tri;
        key.sort_unstable();
        seen.insert(key)
    });
    out
}

/// Lists edges not shared by exactly two triangles.
///
/// An empty result means the welded mesh is closed and manifold.
#[must_use]
pub fn find_bad_edges(mesh: &TriangleMesh) -> Vec<BadEdge> {
    let mut uses: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in &mesh.indices {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            *uses.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }

    let mut bad: Vec<BadEdge> = uses
        .into_iter()
        .filter(|&(_, n)| n != 2)
        .map(|((a, b), n)| BadEdge {
            from: mesh.vertices[a as usize],
            to: mesh.vertices[b as usize],
            uses: n,
        })
        .collect();
    bad.sort_by(|x, y| x.from.x.total_cmp(&y.from.x).then(x.from.y.total_cmp(&y.from.y)));
    bad
}

#[allow(clippy::cast_possible_truncation)]
fn quantize(p: &Point3, tolerance: f64) -> [i64; 3] {
    [
        (p.x / tolerance).round() as i64,
        (p.y / tolerance).round() as i64,
        (p.z / tolerance).round() as i64,
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<[Point3; 3]> {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let d = Point3::new(0.0, 0.0, 1.0);
        vec![[a, c, b], [a, b, d], [b, c, d], [c, a, d]]
    }

    #[test]
    fn welding_closes_loose_tetrahedron() {
        let loose = TriangleMesh::from_triangles(tetrahedron());
        assert_eq!(loose.vertices.len(), 12);
        assert_eq!(find_bad_edges(&loose).len(), 12);

        let welded = weld(&loose, 1e-4);
        assert_eq!(welded.vertices.len(), 4);
        assert_eq!(welded.triangle_count(), 4);
        assert!(find_bad_edges(&welded).is_empty());
    }

    #[test]
    fn welding_drops_collapsed_triangles() {
        let sliver = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.00001, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriangleMesh::from_triangles([sliver]);
        assert!(weld(&mesh, 1e-4).is_empty());
    }

    #[test]
    fn duplicates_are_removed_regardless_of_rotation() {
        let mut tris = tetrahedron();
        let [a, b, c] = tris[0];
        tris.push([b, a, c]);
        let welded = weld(&TriangleMesh::from_triangles(tris), 1e-4);
        assert_eq!(welded.triangle_count(), 5);
        assert!(!find_bad_edges(&welded).is_empty());

        let clean = remove_duplicate_triangles(&welded);
        assert_eq!(clean.triangle_count(), 4);
        assert!(find_bad_edges(&clean).is_empty());
    }
}
