pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::IndexMap;
pub use itertools::{izip, Itertools as _};
pub use label::{DomainTable, HeadRole, Prediction};
pub use log::{debug, info};
pub use model_graph::{Graph, NamedGraph, NodeKey};
pub use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};
pub use tch::{
    nn::{self, Module as _, ModuleT as _},
    Device, Kind, Reduction, Tensor,
};
pub use tensor_shape::{Dim, Shape};
