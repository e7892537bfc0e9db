//! Procedural scenes of a spaceship silhouette in a noisy raster image.

mod common;

pub mod draw;
pub mod renderer;
pub mod spaceship;

pub use draw::*;
pub use renderer::*;
pub use spaceship::*;
