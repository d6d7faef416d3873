use thiserror::Error;

/// Failure modes of the curve kernel.
///
/// None of these are fatal to the caller: the curve generator turns each of
/// them into a logged diagnostic and a smaller (possibly empty) output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CurveError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    #[error("Configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    #[error("Topology unreachable: {0}")]
    TopologyUnreachable(String),

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, CurveError>;
