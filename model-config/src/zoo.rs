//! Layer lists of the base model and the four head models.

use crate::{common::*, module::*};
use label::HeadRole;

/// Parameters of the model family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZooConfig {
    #[serde(default = "default_image_size")]
    pub image_size: usize,
    #[serde(default = "default_filters")]
    pub filters: usize,
}

impl Default for ZooConfig {
    fn default() -> Self {
        Self {
            image_size: default_image_size(),
            filters: default_filters(),
        }
    }
}

/// Channel multipliers of the eight convolution blocks.
const BLOCK_MULTIPLIERS: [usize; 8] = [2, 2, 4, 4, 6, 6, 8, 8];

/// The number of outputs of the base model.
pub const BASE_OUTPUTS: usize = 4;

impl ZooConfig {
    /// The shared feature extractor: input, reshape, eight conv blocks and flatten.
    pub fn trunk(&self) -> Result<Vec<Module>> {
        ensure!(self.image_size > 0, "image_size must be positive");
        ensure!(self.filters > 0, "filters must be positive");

        let size = self.image_size;
        let mut layers: Vec<Module> = vec![
            Input {
                name: name("input")?,
                shape: Shape::batched(&[size, size]),
            }
            .into(),
            Reshape {
                name: name("reshape")?,
                shape: vec![1, size, size],
            }
            .into(),
        ];

        for (index, mult) in BLOCK_MULTIPLIERS.iter().enumerate() {
            let block = index + 1;
            let channels = self.filters * mult;

            for (suffix, stride) in [("a", 1), ("b", 2)] {
                layers.push(
                    Conv2D::new(name(format!("conv{}{}", block, suffix))?, channels, 3)
                        .stride(stride)
                        .into(),
                );
                layers.push(BatchNorm::new(name(format!("bn{}{}", block, suffix))?).into());
                layers.push(
                    Act::new(name(format!("relu{}{}", block, suffix))?, Activation::Relu).into(),
                );
            }
        }

        layers.push(
            Flatten {
                name: name("flatten")?,
            }
            .into(),
        );
        Ok(layers)
    }

    /// The base model regressing `[x, y, height, width]`.
    pub fn base_model(&self) -> Result<Vec<Module>> {
        let mut layers = self.trunk()?;
        layers.extend([
            Linear::new(name("dense")?, 25).into(),
            BatchNorm::new(name("dense_bn")?).into(),
            Act::new(name("dense_relu")?, Activation::Relu).into(),
            Linear::new(name("dense_out")?, BASE_OUTPUTS).into(),
        ]);
        Ok(layers)
    }

    /// A head model. Heads share the trunk layer names with the base model and
    /// reuse the same head layer names, so their layer names collide.
    pub fn head_model(&self, role: HeadRole) -> Result<Vec<Module>> {
        let mut layers = self.trunk()?;

        let head: Vec<Module> = match role {
            HeadRole::Detection => vec![
                Linear::new(name("d1")?, 100).into(),
                Act::new(name("relu1")?, Activation::Relu).into(),
                Linear::new(name("d2")?, 1).into(),
                Act::new(name("tanh1")?, Activation::Tanh).into(),
            ],
            HeadRole::Position => vec![
                Linear::new(name("d1")?, 100).into(),
                BatchNorm::new(name("bn1")?).into(),
                Act::new(name("relu1")?, Activation::Relu).into(),
                Linear::new(name("d2")?, 100).into(),
                BatchNorm::new(name("bn2")?).into(),
                Act::new(name("relu2")?, Activation::Relu).into(),
                Linear::new(name("d3")?, 2).into(),
            ],
            HeadRole::Area => vec![
                Linear::new(name("d1")?, 100).into(),
                Act::new(name("relu1")?, Activation::Relu).into(),
                Linear::new(name("d2")?, 2).into(),
                Act::new(name("tanh1")?, Activation::Tanh).into(),
            ],
            HeadRole::Angle => vec![
                Linear::new(name("d1")?, 100).into(),
                BatchNorm::new(name("bn1")?).into(),
                Act::new(name("relu1")?, Activation::Relu).into(),
                Linear::new(name("d2")?, 2).into(),
                BatchNorm::new(name("bn2")?).into(),
                Act::new(name("tanh1")?, Activation::Tanh).into(),
            ],
        };

        layers.extend(head);
        Ok(layers)
    }
}

fn name<'a>(text: impl Into<Cow<'a, str>>) -> Result<ModuleName> {
    ModuleName::new(text)
}

fn default_image_size() -> usize {
    200
}

fn default_filters() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn final_shape(layers: &[Module]) -> Option<Shape> {
        layers
            .iter()
            .try_fold(None, |shape: Option<Shape>, layer| {
                layer.output_shape(shape.as_ref()).map(Some)
            })
            .flatten()
    }

    #[test]
    fn trunk_shapes() {
        let zoo = ZooConfig::default();
        let trunk = zoo.trunk().unwrap();
        assert_eq!(trunk.len(), 2 + 8 * 6 + 1);
        assert_eq!(final_shape(&trunk), Some(Shape::batched(&[64])));
        assert_eq!(
            final_shape(&trunk[..2]),
            Some(Shape::batched(&[1, 200, 200]))
        );
    }

    #[test]
    fn model_output_shapes() {
        let zoo = ZooConfig::default();
        assert_eq!(
            final_shape(&zoo.base_model().unwrap()),
            Some(Shape::batched(&[4]))
        );

        for role in HeadRole::ALL {
            let outputs = role.variables().len();
            assert_eq!(
                final_shape(&zoo.head_model(role).unwrap()),
                Some(Shape::batched(&[outputs]))
            );
        }
    }

    #[test]
    fn heads_share_layer_names() {
        let zoo = ZooConfig::default();
        let detection = zoo.head_model(HeadRole::Detection).unwrap();
        let area = zoo.head_model(HeadRole::Area).unwrap();
        let names = |layers: &[Module]| -> Vec<String> {
            layers.iter().map(|layer| layer.name().to_string()).collect()
        };
        assert_eq!(names(&detection), names(&area));
    }
}
