use super::*;
use crate::common::*;

/// Flattens each sample into a vector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flatten {
    pub name: ModuleName,
}

impl ModuleEx for Flatten {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        let input_shape = input_shape?;
        if input_shape.len() < 2 {
            return None;
        }
        let batch = input_shape.dims()[0];
        Some(vec![batch, input_shape.sample_numel()].into())
    }
}
