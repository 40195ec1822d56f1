use thiserror::Error;

// Unified error type for fvkit

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FvError {
    #[error("mesh mismatch: {0}")]
    MeshMismatch(&'static str),
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("face {0} is not an exterior face")]
    NotExteriorFace(usize),
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f64),
    #[error("singular matrix")]
    SingularMatrix,
    #[error("indefinite matrix detected (p^T A p <= 0)")]
    IndefiniteMatrix,
    #[error("zero pivot at row {0}")]
    ZeroPivot(usize),
    #[error("solve error: {0}")]
    SolveError(String),
}

pub type Result<T> = std::result::Result<T, FvError>;
