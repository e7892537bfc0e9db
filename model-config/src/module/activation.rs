use super::*;
use crate::common::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Activation {
    Relu,
    Tanh,
    Sigmoid,
    Linear,
}

/// An element-wise activation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Act {
    pub name: ModuleName,
    pub act: Activation,
}

impl Act {
    pub fn new(name: ModuleName, act: Activation) -> Self {
        Self { name, act }
    }
}

impl ModuleEx for Act {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        input_shape.cloned()
    }
}
