use crate::{common::*, error::DomainError};

/// A closed interval `[min, max]` with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(R64, R64)", into = "(R64, R64)")]
pub struct Bounds {
    min: R64,
    max: R64,
}

impl Bounds {
    /// The target interval of normalized labels.
    pub fn unit() -> Self {
        Self {
            min: r64(-1.0),
            max: r64(1.0),
        }
    }

    pub fn new(min: f64, max: f64) -> Result<Self, DomainError> {
        let (min, max) = match (R64::try_new(min), R64::try_new(max)) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(DomainError::NonFinite { min, max }),
        };
        if min >= max {
            return Err(DomainError::Empty {
                min: min.raw(),
                max: max.raw(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min.raw()
    }

    pub fn max(&self) -> f64 {
        self.max.raw()
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min).raw()
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min()..=self.max()).contains(&value)
    }

    /// Clamps the value into the interval. NaN is kept.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min(), self.max())
    }
}

impl TryFrom<(R64, R64)> for Bounds {
    type Error = DomainError;

    fn try_from((min, max): (R64, R64)) -> Result<Self, Self::Error> {
        Self::new(min.raw(), max.raw())
    }
}

impl From<Bounds> for (R64, R64) {
    fn from(bounds: Bounds) -> Self {
        (bounds.min, bounds.max)
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Affine map from a declared domain into a target interval, followed by clamping.
///
/// The map is monotonic and keeps the missing-value sentinel (NaN) untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeNormalizer {
    domain: Bounds,
    target: Bounds,
}

impl RangeNormalizer {
    /// Creates a normalizer into `[-1, 1]`.
    pub fn new(domain: Bounds) -> Self {
        Self::with_target(domain, Bounds::unit())
    }

    pub fn with_target(domain: Bounds, target: Bounds) -> Self {
        Self { domain, target }
    }

    pub fn domain(&self) -> Bounds {
        self.domain
    }

    pub fn target(&self) -> Bounds {
        self.target
    }

    pub fn normalize(&self, value: f64) -> f64 {
        let Self { domain, target } = *self;
        let mapped = target.span() * (value - domain.min()) / domain.span() + target.min();
        target.clamp(mapped)
    }

    pub fn normalize_array(&self, values: ArrayView1<f64>) -> Array1<f64> {
        values.mapv(|value| self.normalize(value))
    }

    /// The inverse map from the target interval back into the domain.
    pub fn denormalize(&self, value: f64) -> f64 {
        let Self { domain, target } = *self;
        let mapped = domain.span() * (value - target.min()) / target.span() + domain.min();
        domain.clamp(mapped)
    }
}
