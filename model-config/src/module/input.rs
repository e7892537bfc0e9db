use super::*;
use crate::common::*;

/// The placeholder of the model input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Input {
    pub name: ModuleName,
    pub shape: Shape,
}

impl ModuleEx for Input {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        match input_shape {
            None => Some(self.shape.clone()),
            Some(input_shape) => input_shape.equalize(&self.shape),
        }
    }
}
