pub use anyhow::{ensure, Error, Result};
pub use noisy_float::prelude::*;
pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    borrow::{Borrow, Cow},
    fmt::{self, Display, Formatter},
    str::FromStr,
};
pub use strum::AsRefStr;
pub use tensor_shape::{Dim, Shape};
