use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::tessellation::TriangleMesh;

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: [f64; 3]) -> [f32; 3] {
    [v[0] as f32, v[1] as f32, v[2] as f32]
}

/// Writes `mesh` as binary STL with per-triangle flat normals.
///
/// # Errors
///
/// Returns `DiceError::Io` if the writer fails.
pub fn write_stl<W: Write>(writer: &mut W, mesh: &TriangleMesh) -> Result<()> {
    let triangles: Vec<stl_io::Triangle> = (0..mesh.triangle_count())
        .map(|i| {
            let n = mesh.triangle_normal(i);
            let [a, b, c] = mesh.triangle(i);
            stl_io::Triangle {
                normal: stl_io::Normal::new(to_f32([n.x, n.y, n.z])),
                vertices: [a, b, c].map(|p| stl_io::Vertex::new(to_f32([p.x, p.y, p.z]))),
            }
        })
        .collect();
    stl_io::write_stl(writer, triangles.iter())?;
    Ok(())
}

/// Writes `mesh` to a binary STL file at `path`.
///
/// # Errors
///
/// Returns `DiceError::Io` if the file cannot be created or written.
pub fn save_stl(path: impl AsRef<Path>, mesh: &TriangleMesh) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(&mut writer, mesh)?;
    writer.flush()?;
    info!(path = %path.display(), triangles = mesh.triangle_count(), "saved stl");
    Ok(())
}
