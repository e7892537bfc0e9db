//! Layer specifications of the spaceship models.

mod common;
pub mod module;
pub mod zoo;

pub use module::*;
pub use tensor_shape::{Dim, Shape};
pub use zoo::*;
