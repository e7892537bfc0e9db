pub use anyhow::{ensure, Error, Result};
pub use label::RawLabel;
pub use ndarray::{Array2, Axis};
pub use noisy_float::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{convert::TryFrom, f64::consts::PI};
pub use strum::{AsRefStr, EnumString};
