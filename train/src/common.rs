//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context, Result};
pub use hydra_data::{Batch, BatchAssembler};
pub use hydra_dl::{ArtifactError, LossKind, ModelArtifact, TensorBatch};
pub use itertools::Itertools as _;
pub use label::{DomainTable, HeadRole, Variable};
pub use model_config::ZooConfig;
pub use model_graph::Graph;
pub use noisy_float::prelude::*;
pub use scene::{ObjectPresence, SpaceshipConfig, SpaceshipRenderer};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Display, Formatter},
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    str::FromStr,
    time::{Duration, Instant},
};
pub use tch::{
    nn::{self, OptimizerConfig as _},
    Device,
};
pub use thiserror::Error;
pub use tracing::{info, info_span, warn};
