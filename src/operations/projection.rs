use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{GeometryError, Result};
use crate::math::{Isometry3, Point2, Point3, Rotation3, Vector3, LINEAR_TOLERANCE, TOLERANCE};

/// A planar point set expressed in its own +Z-facing frame.
#[derive(Debug, Clone)]
pub struct CoplanarProjection {
    /// The points in the plane's local 2-D frame, in input order.
    pub outline: Vec<Point2>,
    /// Mean of the input points; origin of the local frame.
    pub centroid: Point3,
    /// Unit plane normal.
    pub normal: Vector3,
    /// Rotation taking local +Z onto `normal`.
    pub rotation: Rotation3,
}

impl CoplanarProjection {
    /// Transform placing local geometry back onto the original plane.
    #[must_use]
    pub fn placement(&self) -> Isometry3 {
        Isometry3::from_parts(self.centroid.coords.into(), self.rotation)
    }
}

/// Projects coplanar 3-D points into a canonical +Z-facing 2-D frame.
///
/// The normal follows the right-hand rule over the point order, so a loop
/// that is counter-clockwise seen from outside yields an outward normal.
pub struct ProjectCoplanar<'a> {
    points: &'a [Point3],
    up: Option<Vector3>,
}

impl<'a> ProjectCoplanar<'a> {
    /// Creates a new `ProjectCoplanar` operation.
    #[must_use]
    pub fn new(points: &'a [Point3]) -> Self {
        Self { points, up: None }
    }

    /// Spins the frame about the normal so `up` projects onto local +Y.
    ///
    /// Ignored when `up` is parallel to the normal.
    #[must_use]
    pub fn with_up(mut self, up: Vector3) -> Self {
        self.up = Some(up);
        self
    }

    /// Executes the projection.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for fewer than three points,
    /// `GeometryError::Degenerate` if all points are collinear, and
    /// `GeometryError::NonPlanar` if any point lies off the plane.
    pub fn execute(&self) -> Result<CoplanarProjection> {
        let n = self.points.len();
        if n < 3 {
            return Err(GeometryError::TooFewPoints { needed: 3, got: n }.into());
        }

        #[allow(clippy::cast_precision_loss)]
        let centroid = Point3::from(
            self.points
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.coords)
                / n as f64,
        );

        let normal = (0..n)
            .map(|i| (self.points[i] - centroid).cross(&(self.points[(i + 1) % n] - centroid)))
            .find(|c| c.norm() > TOLERANCE)
            .map(|c| c.normalize())
            .ok_or_else(|| GeometryError::Degenerate("points are collinear".into()))?;

        let mut rotation = Rotation3::rotation_between(&Vector3::z(), &normal)
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI));

        if let Some(up) = self.up {
            let local = rotation.inverse_transform_vector(&up);
            if local.x.hypot(local.y) > TOLERANCE {
                let spin = local.y.atan2(local.x) - FRAC_PI_2;
                rotation *= Rotation3::from_axis_angle(&Vector3::z_axis(), spin);
            }
        }

        let mut outline = Vec::with_capacity(n);
        for p in self.points {
            let local = rotation.inverse_transform_vector(&(p - centroid));
            if local.z.abs() > LINEAR_TOLERANCE {
                return Err(GeometryError::NonPlanar {
                    residual: local.z.abs(),
                }
                .into());
            }
            outline.push(Point2::new(local.x, local.y));
        }

        Ok(CoplanarProjection {
            outline,
            centroid,
            normal,
            rotation,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::DiceError;
    use crate::math::polygon_2d::signed_area;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_facing_plus_y() {
        // Counter-clockwise seen from +Y.
        let pts = [
            p(1.0, 3.0, 1.0),
            p(1.0, 3.0, -1.0),
            p(-1.0, 3.0, -1.0),
            p(-1.0, 3.0, 1.0),
        ];
        let proj = ProjectCoplanar::new(&pts).execute().unwrap();
        assert_relative_eq!(proj.centroid.y, 3.0);
        assert_relative_eq!(proj.normal.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(signed_area(&proj.outline), 4.0, epsilon = 1e-9);

        // Local geometry maps back onto the input points.
        let iso = proj.placement();
        for (q, orig) in proj.outline.iter().zip(&pts) {
            let back = iso * Point3::new(q.x, q.y, 0.0);
            assert_relative_eq!((back - orig).norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn opposite_normal_uses_half_turn() {
        let pts = [p(0.0, 0.0, 0.0), p(0.0, 1.0, 0.0), p(1.0, 0.0, 0.0)];
        let proj = ProjectCoplanar::new(&pts).execute().unwrap();
        assert_relative_eq!(proj.normal.z, -1.0, epsilon = 1e-12);
        let z = proj.rotation * Vector3::z();
        assert_relative_eq!(z.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn up_hint_aligns_local_y() {
        // Facing +X; without a hint local +Y would land on world Y.
        let pts = [
            p(2.0, 1.0, -1.0),
            p(2.0, 1.0, 1.0),
            p(2.0, -1.0, 1.0),
            p(2.0, -1.0, -1.0),
        ];
        let proj = ProjectCoplanar::new(&pts)
            .with_up(Vector3::z())
            .execute()
            .unwrap();
        assert_relative_eq!(proj.normal.x, 1.0, epsilon = 1e-12);
        let local_y = proj.rotation * Vector3::y();
        assert_relative_eq!(local_y.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(proj.outline[1].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_planar_points_are_rejected() {
        let pts = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.5),
            p(0.0, 1.0, 0.0),
        ];
        let err = ProjectCoplanar::new(&pts).execute().unwrap_err();
        assert!(matches!(err, DiceError::Geometry(GeometryError::NonPlanar { .. })));
    }

    #[test]
    fn too_few_points_are_rejected() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let err = ProjectCoplanar::new(&pts).execute().unwrap_err();
        assert!(matches!(
            err,
            DiceError::Geometry(GeometryError::TooFewPoints { needed: 3, got: 2 })
        ));
    }
}
