//! Mesh export.

mod stl;

pub use stl::{save_stl, write_stl};
