//! Tensor shapes with an optionally inferred dimension.

mod common;
mod dim;
mod shape;

pub use dim::*;
pub use shape::*;
