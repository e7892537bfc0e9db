//! Supervised batches for the spaceship prediction heads.

mod common;

pub mod batch;
pub mod error;

pub use batch::*;
pub use error::*;
