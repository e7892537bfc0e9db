pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use indexmap::{IndexMap, IndexSet};
pub use label::HeadRole;
pub use log::{debug, info};
pub use model_config::{Input, Module, ModuleEx, ModuleName};
pub use serde::{Deserialize, Serialize};
pub use std::{
    convert::TryFrom,
    fmt::{self, Display, Formatter},
    fs,
    io::BufWriter,
    iter,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};
pub use tensor_shape::Shape;
