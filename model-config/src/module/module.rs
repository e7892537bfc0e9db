use super::*;
use crate::common::*;

pub trait ModuleEx {
    fn name(&self) -> &ModuleName;

    /// Infers the output shape from the input shape. `None` input is given
    /// only to input layers.
    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Module {
    Input(Input),
    Reshape(Reshape),
    Conv2D(Conv2D),
    BatchNorm(BatchNorm),
    Act(Act),
    Flatten(Flatten),
    Linear(Linear),
}

impl Module {
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Returns a copy of the layer under a new name.
    pub fn with_name(&self, name: ModuleName) -> Module {
        match self {
            Module::Input(layer) => Module::Input(Input {
                name,
                ..layer.clone()
            }),
            Module::Reshape(layer) => Module::Reshape(Reshape {
                name,
                ..layer.clone()
            }),
            Module::Conv2D(layer) => Module::Conv2D(Conv2D {
                name,
                ..layer.clone()
            }),
            Module::BatchNorm(layer) => Module::BatchNorm(BatchNorm {
                name,
                ..layer.clone()
            }),
            Module::Act(layer) => Module::Act(Act {
                name,
                ..layer.clone()
            }),
            Module::Flatten(_) => Module::Flatten(Flatten { name }),
            Module::Linear(layer) => Module::Linear(Linear {
                name,
                ..layer.clone()
            }),
        }
    }
}

impl ModuleEx for Module {
    fn name(&self) -> &ModuleName {
        match self {
            Module::Input(layer) => layer.name(),
            Module::Reshape(layer) => layer.name(),
            Module::Conv2D(layer) => layer.name(),
            Module::BatchNorm(layer) => layer.name(),
            Module::Act(layer) => layer.name(),
            Module::Flatten(layer) => layer.name(),
            Module::Linear(layer) => layer.name(),
        }
    }

    fn output_shape(&self, input_shape: Option<&Shape>) -> Option<Shape> {
        match self {
            Module::Input(layer) => layer.output_shape(input_shape),
            Module::Reshape(layer) => layer.output_shape(input_shape),
            Module::Conv2D(layer) => layer.output_shape(input_shape),
            Module::BatchNorm(layer) => layer.output_shape(input_shape),
            Module::Act(layer) => layer.output_shape(input_shape),
            Module::Flatten(layer) => layer.output_shape(input_shape),
            Module::Linear(layer) => layer.output_shape(input_shape),
        }
    }
}

macro_rules! impl_from_layer {
    ($($layer:ident),*) => {
        $(
            impl From<$layer> for Module {
                fn from(layer: $layer) -> Self {
                    Module::$layer(layer)
                }
            }
        )*
    };
}

impl_from_layer!(Input, Reshape, Conv2D, BatchNorm, Act, Flatten, Linear);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_serde_tag() {
        let text = r#"{"kind": "Linear", "name": "d1", "out": 100}"#;
        let module: Module = serde_json::from_str(text).unwrap();
        assert_eq!(module.as_ref(), "Linear");
        assert_eq!(module.name().as_str(), "d1");

        let bad = r#"{"kind": "Linear", "name": "d.1", "out": 100}"#;
        assert!(serde_json::from_str::<Module>(bad).is_err());
    }

    #[test]
    fn with_name_keeps_config() {
        let orig: Module = Conv2D::new(ModuleName::new("conv1a").unwrap(), 16, 3)
            .stride(2)
            .into();
        let renamed = orig.with_name(ModuleName::new("conv1a-h0001").unwrap());

        assert_eq!(orig.name().as_str(), "conv1a");
        assert_eq!(renamed.name().as_str(), "conv1a-h0001");
        match renamed {
            Module::Conv2D(conv) => {
                assert_eq!(conv.c, 16);
                assert_eq!(conv.s, 2);
            }
            _ => unreachable!(),
        }
    }
}
