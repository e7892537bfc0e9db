use thiserror::Error;

/// Errors raised while encoding labels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    #[error("invalid angle at row {row}: {angle} decodes back to {recovered}")]
    InvalidAngle {
        row: usize,
        angle: f64,
        recovered: f64,
    },
}

/// Errors raised when declaring the bounds of a variable domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("domain bounds must be finite, but get ({min}, {max})")]
    NonFinite { min: f64, max: f64 },
    #[error("domain upper bound {max} must be greater than lower bound {min}")]
    Empty { min: f64, max: f64 },
}
