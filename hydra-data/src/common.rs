pub use label::{DomainTable, EncodedLabels, LabelError, RawLabel, Variable};
pub use log::debug;
pub use ndarray::{Array2, Array3, Axis};
pub use scene::{ObjectPresence, Renderer, Scene};
