use label::{LabelError, Variable};
use thiserror::Error;

/// Validation failures of batch assembly.
///
/// Every failure aborts the batch. No partially valid batch is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error("invalid angle at sample {row}: {angle} decodes back to {recovered}")]
    InvalidAngle {
        row: usize,
        angle: f64,
        recovered: f64,
    },
    #[error("sample {index} has image shape {found:?}, but expect {expect:?}")]
    ImageShape {
        index: usize,
        expect: [usize; 2],
        found: [usize; 2],
    },
    #[error("image values must lie in [-1, 1], but get range [{min}, {max}] and {num_nan} NaN values")]
    ImageRange { min: f32, max: f32, num_nan: usize },
    #[error("expect label matrix of shape {expect:?}, but get {found:?}")]
    Shape {
        expect: (usize, usize),
        found: (usize, usize),
    },
    #[error("label '{variable}' of sample {row} is {value}, which is outside [-1, 1]")]
    Range {
        row: usize,
        variable: Variable,
        value: f32,
    },
}

impl From<LabelError> for BatchError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::InvalidAngle {
                row,
                angle,
                recovered,
            } => Self::InvalidAngle {
                row,
                angle,
                recovered,
            },
        }
    }
}
