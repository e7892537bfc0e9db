//! Computation graphs of layer specifications and the splicing of several
//! single-head graphs into one multi-head graph.

mod common;
mod graph;
mod named;
mod splice;

pub use graph::*;
pub use named::*;
pub use splice::*;
