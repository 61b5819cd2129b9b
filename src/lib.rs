pub mod blank;
pub mod builder;
pub mod dice;
pub mod error;
pub mod geometry;
pub mod io;
pub mod legend;
pub mod math;
pub mod operations;
pub mod tessellation;

pub use builder::{Builder, BuilderConfig, BuildReport, BuiltFace, FaceStatus};
pub use dice::{DieKind, DieModel, DieParams, FaceParams, ALL_DICE};
pub use error::{DiceError, Result};
