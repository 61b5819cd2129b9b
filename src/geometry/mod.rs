pub mod curve;
pub mod shape;

pub use curve::{EllipseArc, Segment};
pub use shape::{Contour, Shape, DEFAULT_DIVISIONS};
