use super::*;
use crate::common::*;

/// Reshapes each sample, keeping the batch dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reshape {
    pub name: ModuleName,
    /// The sample shape without the batch dimension.
    pub shape: Vec<usize>,
}

impl ModuleEx for Reshape {
    fn name(&self) -> &ModuleName {
        &self.name
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        let input_shape = input_shape?;
        let batch = *input_shape.dims().first()?;
        let numel: usize = self.shape.iter().product();

        if let Dim::Size(in_numel) = input_shape.sample_numel() {
            if in_numel != numel {
                return None;
            }
        }

        let dims: Vec<Dim> = std::iter::once(batch)
            .chain(self.shape.iter().cloned().map(Dim::Size))
            .collect();
        Some(dims.into())
    }
}
