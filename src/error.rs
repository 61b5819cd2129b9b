use thiserror::Error;

/// Top-level error type for dice construction and engraving.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("points are not coplanar (residual {residual:e})")]
    NonPlanar { residual: f64 },

    #[error("need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while constructing a die blank or its faces.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("cannot build a die with {sides} sides: {reason}")]
    InvalidSideCount { sides: usize, reason: &'static str },

    #[error("unexpected solid topology: {0}")]
    UnexpectedTopology(String),

    #[error("unknown die kind: {0}")]
    UnknownDie(String),
}

/// Errors related to engraving and fitting operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("legend scale search did not converge after {iterations} iterations")]
    NotConverging { iterations: usize },

    #[error("legend does not fit inside the face")]
    LegendDoesNotFit,
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`DiceError`].
pub type Result<T> = std::result::Result<T, DiceError>;
