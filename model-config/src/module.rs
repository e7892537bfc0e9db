mod activation;
mod batch_norm;
mod conv_2d;
mod flatten;
mod input;
mod linear;
mod module;
mod module_name;
mod reshape;

pub use activation::*;
pub use batch_norm::*;
pub use conv_2d::*;
pub use flatten::*;
pub use input::*;
pub use linear::*;
pub use module::*;
pub use module_name::*;
pub use reshape::*;
