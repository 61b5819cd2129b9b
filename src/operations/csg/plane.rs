use crate::math::{Point3, Vector3, TOLERANCE};

use super::polygon::CsgPolygon;

/// Classification tolerance for points against a splitting plane.
pub const PLANE_EPSILON: f64 = 1e-7;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// An oriented plane `normal · p = w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3,
    pub w: f64,
}

/// Where the pieces of a split polygon ended up.
#[derive(Debug, Default)]
pub struct Split {
    pub coplanar_front: Vec<CsgPolygon>,
    pub coplanar_back: Vec<CsgPolygon>,
    pub front: Vec<CsgPolygon>,
    pub back: Vec<CsgPolygon>,
}

impl Plane {
    /// Plane through three points, oriented by their counter-clockwise order.
    ///
    /// Returns `None` for collinear points.
    #[must_use]
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len < TOLERANCE {
            return None;
        }
        let normal = n / len;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Signed distance from `p` to the plane.
    #[must_use]
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Returns `true` if both planes describe the same oriented plane.
    #[must_use]
    pub fn same_as(&self, other: &Self, tolerance: f64) -> bool {
        self.normal.dot(&other.normal) > 1.0 - tolerance && (self.w - other.w).abs() < tolerance
    }

    /// Splits `polygon` by this plane into the four buckets of `out`.
    pub fn split_polygon(&self, polygon: &CsgPolygon, out: &mut Split) {
        let mut polygon_type = COPLANAR;
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| {
                let t = self.distance(v);
                let ty = if t < -PLANE_EPSILON {
                    BACK
                } else if t > PLANE_EPSILON {
                    FRONT
                } else {
                    COPLANAR
                };
                polygon_type |= ty;
                ty
            })
            .collect();

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    out.coplanar_front.push(polygon.clone());
                } else {
                    out.coplanar_back.push(polygon.clone());
                }
            }
            FRONT => out.front.push(polygon.clone()),
            BACK => out.back.push(polygon.clone()),
            _ => {
                let mut f: Vec<Point3> = Vec::new();
                let mut b: Vec<Point3> = Vec::new();
                let count = polygon.vertices.len();
                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.coords)) / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    out.front.push(CsgPolygon::with_plane(f, polygon.plane));
                }
                if b.len() >= 3 {
                    out.back.push(CsgPolygon::with_plane(b, polygon.plane));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn square(z: f64) -> CsgPolygon {
        CsgPolygon::new(vec![
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn plane_from_ccw_points_faces_up() {
        let p = Plane::from_points(
            &Point3::new(0.0, 0.0, 2.0),
            &Point3::new(1.0, 0.0, 2.0),
            &Point3::new(0.0, 1.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(p.normal.z, 1.0);
        assert_relative_eq!(p.w, 2.0);
        assert_relative_eq!(p.distance(&Point3::new(5.0, 5.0, 3.0)), 1.0);
    }

    #[test]
    fn spanning_polygon_is_cut_in_two() {
        let cutter = Plane {
            normal: Vector3::x(),
            w: 0.0,
        };
        let mut out = Split::default();
        cutter.split_polygon(&square(0.0), &mut out);
        assert_eq!(out.front.len(), 1);
        assert_eq!(out.back.len(), 1);
        assert!(out.front[0].vertices.iter().all(|v| v.x >= -PLANE_EPSILON));
        assert!(out.back[0].vertices.iter().all(|v| v.x <= PLANE_EPSILON));
    }

    #[test]
    fn coplanar_polygon_sorted_by_facing() {
        let up = Plane {
            normal: Vector3::z(),
            w: 0.0,
        };
        let mut down = up;
        down.flip();
        let mut out = Split::default();
        up.split_polygon(&square(0.0), &mut out);
        down.split_polygon(&square(0.0), &mut out);
        assert_eq!(out.coplanar_front.len(), 1);
        assert_eq!(out.coplanar_back.len(), 1);
    }
}
