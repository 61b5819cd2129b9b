//! Polygon-soup constructive solid geometry on BSP trees.

mod node;
mod plane;
mod polygon;
pub mod primitives;
mod solid;

pub use plane::{Plane, PLANE_EPSILON};
pub use polygon::CsgPolygon;
pub use solid::{CsgSolid, PlanarFace};
