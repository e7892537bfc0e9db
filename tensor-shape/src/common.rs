pub use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    fmt::{self, Display, Formatter},
    ops::Mul,
};
