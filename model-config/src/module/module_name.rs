use crate::common::*;

/// The identifier of a layer. It is non-empty and contains no dot '.', which
/// separates path components of parameter names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new<'a>(name: impl Into<Cow<'a, str>>) -> Result<Self> {
        let name = name.into().into_owned();
        ensure!(!name.is_empty(), "module name must not be empty");
        ensure!(!name.contains('.'), "module name must not contain dot '.'");
        Ok(Self(name))
    }

    /// Creates a new name `<name>-<suffix>`.
    pub fn suffixed(&self, suffix: &str) -> Result<Self> {
        Self::new(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ModuleName {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl Serialize for ModuleName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ModuleName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let name = Self::new(text)
            .map_err(|err| D::Error::custom(format!("invalid name: {:?}", err)))?;
        Ok(name)
    }
}

impl Borrow<str> for ModuleName {
    fn borrow(&self) -> &str {
        self.0.as_ref()
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
