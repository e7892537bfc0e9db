pub use itertools::izip;
pub use ndarray::{s, Array1, Array2, ArrayView1};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    convert::TryFrom,
    f64::consts::PI,
    fmt::{self, Display, Formatter},
    str::FromStr,
};
pub use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
