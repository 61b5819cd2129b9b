use crate::math::polygon_2d::convex_hull;
use crate::math::{Point2, Point3, Vector3, LINEAR_TOLERANCE};

use super::node::Node;
use super::plane::Plane;
use super::polygon::CsgPolygon;

/// Fragments smaller than this are dropped when regrouping faces.
const MIN_FACE_AREA: f64 = 1e-9;

/// A closed solid bounded by convex polygons.
#[derive(Debug, Clone, Default)]
pub struct CsgSolid {
    polygons: Vec<CsgPolygon>,
}

/// One flat face of a convex solid, merged from all coplanar fragments.
#[derive(Debug, Clone)]
pub struct PlanarFace {
    /// Outward unit normal.
    pub normal: Vector3,
    /// Boundary, counter-clockwise seen from outside, without collinear points.
    pub boundary: Vec<Point3>,
}

impl PlanarFace {
    #[must_use]
    pub fn centroid(&self) -> Point3 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.boundary.len().max(1) as f64;
        Point3::from(
            self.boundary
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.coords)
                / n,
        )
    }
}

impl CsgSolid {
    #[must_use]
    pub fn from_polygons(polygons: Vec<CsgPolygon>) -> Self {
        Self { polygons }
    }

    #[must_use]
    pub fn polygons(&self) -> &[CsgPolygon] {
        &self.polygons
    }

    /// Boolean intersection: the space inside both solids.
    #[must_use]
    pub fn intersect(&self, other: &CsgSolid) -> CsgSolid {
        let mut a = Node::new(&self.polygons);
        let mut b = Node::new(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        CsgSolid::from_polygons(a.all_polygons())
    }

    /// Regroups the solid's polygons into one boundary loop per distinct plane.
    ///
    /// Only meaningful for convex solids, where every face is convex and the
    /// hull of a plane's fragments is the face itself.
    #[must_use]
    pub fn planar_faces(&self) -> Vec<PlanarFace> {
        let mut groups: Vec<(Plane, Vec<&CsgPolygon>)> = Vec::new();
        for polygon in self.polygons.iter().filter(|p| p.area() > MIN_FACE_AREA) {
            match groups
                .iter_mut()
                .find(|(plane, _)| plane.same_as(&polygon.plane, LINEAR_TOLERANCE))
            {
                Some((_, members)) => members.push(polygon),
                None => groups.push((polygon.plane, vec![polygon])),
            }
        }

        groups
            .into_iter()
            .filter_map(|(plane, members)| {
                let normal = plane.normal;
                let u = any_perpendicular(&normal);
                let v = normal.cross(&u);
                let origin = Point3::from(normal * plane.w);

                let flat: Vec<Point2> = members
                    .iter()
                    .flat_map(|p| p.vertices.iter())
                    .map(|p| {
                        let d = p - origin;
                        Point2::new(d.dot(&u), d.dot(&v))
                    })
                    .collect();
                let hull = convex_hull(&flat, LINEAR_TOLERANCE);
                if hull.len() < 3 {
                    return None;
                }
                let boundary = hull
                    .iter()
                    .map(|q| origin + u * q.x + v * q.y)
                    .collect();
                Some(PlanarFace { normal, boundary })
            })
            .collect()
    }
}

/// A unit vector perpendicular to `n`.
fn any_perpendicular(n: &Vector3) -> Vector3 {
    let helper = if n.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    n.cross(&helper).normalize()
}
