pub mod csg;
pub mod engrave;
pub mod fit;
pub mod planar;
pub mod projection;
