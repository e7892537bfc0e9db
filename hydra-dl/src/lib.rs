//! The libtorch runtime of the spaceship models: building models from graphs,
//! model artifacts on disk and the composition of trained heads.

mod common;

pub mod artifact;
pub mod compose;
pub mod loss;
pub mod model;
pub mod tensor;

pub use artifact::*;
pub use compose::*;
pub use loss::*;
pub use model::*;
pub use tensor::*;
