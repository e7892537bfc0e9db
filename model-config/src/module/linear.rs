use super::*;
use crate::common::*;

/// A fully connected layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Linear {
    pub name: ModuleName,
    pub out: usize,
    #[serde(default = "default_bias")]
    pub bias: bool,
}

impl Linear {
    pub fn new(name: ModuleName, out: usize) -> Self {
        Self {
            name,
            out,
            bias: default_bias(),
        }
    }
}

impl ModuleEx for Linear {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        match input_shape?.dims() {
            &[batch, Dim::Size(_)] => Some(vec![batch, Dim::Size(self.out)].into()),
            _ => None,
        }
    }
}

fn default_bias() -> bool {
    true
}
