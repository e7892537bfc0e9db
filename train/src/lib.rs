//! The training program of the spaceship prediction heads.

pub mod combine;
pub mod common;
pub mod config;
pub mod preview;
pub mod target;
pub mod train;
pub mod utils;

pub use combine::combine;
pub use preview::preview;
pub use target::Target;
pub use train::{train, train_all, TrainOutcome};
