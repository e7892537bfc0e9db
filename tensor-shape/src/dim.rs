use crate::common::*;

/// A tensor dimension. The batch dimension is usually [Dim::Infer].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Size(usize),
    Infer,
}

impl Dim {
    pub fn size(&self) -> Option<usize> {
        match *self {
            Self::Size(size) => Some(size),
            Self::Infer => None,
        }
    }

    pub fn is_compatible_with(&self, other: &Dim) -> bool {
        self.equalize(other).is_some()
    }

    /// Returns the more specific of two compatible dimensions.
    pub fn equalize(&self, other: &Dim) -> Option<Dim> {
        match (*self, *other) {
            (Self::Size(lhs), Self::Size(rhs)) => (lhs == rhs).then(|| *self),
            (Self::Size(_), Self::Infer) => Some(*self),
            (Self::Infer, _) => Some(*other),
        }
    }
}

impl From<usize> for Dim {
    fn from(size: usize) -> Self {
        Self::Size(size)
    }
}

impl Mul<Dim> for Dim {
    type Output = Dim;

    fn mul(self, rhs: Dim) -> Self::Output {
        match (self, rhs) {
            (Self::Size(lhs), Self::Size(rhs)) => Self::Size(lhs * rhs),
            _ => Self::Infer,
        }
    }
}

impl Display for Dim {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(size) => Display::fmt(size, f),
            Self::Infer => write!(f, "_"),
        }
    }
}

impl Serialize for Dim {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Size(size) => size.serialize(serializer),
            Self::Infer => "_".serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Dim {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde_json::Value;

        match Value::deserialize(deserializer)? {
            Value::String(text) if text == "_" => Ok(Self::Infer),
            Value::Number(number) => number
                .as_u64()
                .map(|size| Self::Size(size as usize))
                .ok_or_else(|| D::Error::custom(format!("'{}' is not a dimension", number))),
            value => Err(D::Error::custom(format!("'{}' is not a dimension", value))),
        }
    }
}
