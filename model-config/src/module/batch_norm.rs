use super::*;
use crate::common::*;

/// Batch normalization over the channel dimension of a 2D or 4D input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchNorm {
    pub name: ModuleName,
    #[serde(default = "default_momentum")]
    pub momentum: R64,
    #[serde(default = "default_eps")]
    pub eps: R64,
}

impl BatchNorm {
    pub fn new(name: ModuleName) -> Self {
        Self {
            name,
            momentum: default_momentum(),
            eps: default_eps(),
        }
    }
}

impl ModuleEx for BatchNorm {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        let input_shape = input_shape?;
        match input_shape.len() {
            2 | 4 => Some(input_shape.clone()),
            _ => None,
        }
    }
}

fn default_momentum() -> R64 {
    r64(0.1)
}

fn default_eps() -> R64 {
    r64(1e-5)
}
