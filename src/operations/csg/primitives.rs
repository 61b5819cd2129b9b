use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};

use super::polygon::CsgPolygon;
use super::solid::CsgSolid;

/// Point on a ring about the Y axis; azimuth zero lies on +Z and grows towards +X.
#[must_use]
pub fn ring_point(radius: f64, y: f64, azimuth: f64) -> Point3 {
    Point3::new(radius * azimuth.sin(), y, radius * azimuth.cos())
}

#[allow(clippy::cast_precision_loss)]
fn ring(sides: usize, radius: f64, y: f64, start: f64) -> Vec<Point3> {
    (0..sides)
        .map(|k| ring_point(radius, y, start + TAU * k as f64 / sides as f64))
        .collect()
}

fn polygon(vertices: Vec<Point3>) -> Result<CsgPolygon> {
    CsgPolygon::new(vertices)
        .ok_or_else(|| GeometryError::Degenerate("collinear primitive face".into()).into())
}

/// A closed right pyramid with a regular `sides`-gon base about the Y axis.
///
/// The apex may lie above or below the base plane.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` for fewer than three sides, a
/// non-positive radius, or a zero height.
pub fn pyramid(sides: usize, radius: f64, apex_y: f64, base_y: f64, start: f64) -> Result<CsgSolid> {
    if sides < 3 || radius < TOLERANCE || (apex_y - base_y).abs() < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "pyramid with {sides} sides, radius {radius}, height {}",
            apex_y - base_y
        ))
        .into());
    }
    let apex = Point3::new(0.0, apex_y, 0.0);
    let mut base = ring(sides, radius, base_y, start);
    let upward = apex_y > base_y;

    let mut polygons = Vec::with_capacity(sides + 1);
    for k in 0..sides {
        let (a, b) = (base[k], base[(k + 1) % sides]);
        let tri = if upward { vec![apex, a, b] } else { vec![apex, b, a] };
        polygons.push(polygon(tri)?);
    }
    // Increasing azimuth winds counter-clockwise seen from +Y.
    if upward {
        base.reverse();
    }
    polygons.push(polygon(base)?);
    Ok(CsgSolid::from_polygons(polygons))
}

/// A closed right prism with a regular `sides`-gon cross-section about the Y axis,
/// centred on the origin.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` for fewer than three sides or a
/// non-positive radius or height.
pub fn prism(sides: usize, radius: f64, height: f64, start: f64) -> Result<CsgSolid> {
    if sides < 3 || radius < TOLERANCE || height < TOLERANCE {
        return Err(GeometryError::Degenerate(format!(
            "prism with {sides} sides, radius {radius}, height {height}"
        ))
        .into());
    }
    let bottom = ring(sides, radius, -height / 2.0, start);
    let top = ring(sides, radius, height / 2.0, start);

    let mut polygons = Vec::with_capacity(sides + 2);
    for k in 0..sides {
        let j = (k + 1) % sides;
        polygons.push(polygon(vec![bottom[k], bottom[j], top[j], top[k]])?);
    }
    polygons.push(polygon(top)?);
    polygons.push(polygon(bottom.into_iter().rev().collect())?);
    Ok(CsgSolid::from_polygons(polygons))
}
