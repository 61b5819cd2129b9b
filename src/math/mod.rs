pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for face orientation.
pub type Rotation3 = nalgebra::UnitQuaternion<f64>;

/// Rigid transform (rotation followed by translation).
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance for geometry measured in model units (millimetres).
pub const LINEAR_TOLERANCE: f64 = 1e-6;
