use crate::common::*;
use model_config::{self as config, Activation, ModuleEx as _};
use model_graph::{self as graph, InputKeys};

/// A model running on libtorch built from a computation graph.
///
/// Parameters of a layer are registered under the layer name, so the
/// variable names of a model are `<layer name>.<parameter>`.
#[derive(Debug)]
pub struct HydraModel {
    layers: IndexMap<NodeKey, Layer>,
    input_shape: Shape,
    outputs: IndexMap<String, NodeKey>,
    device: Device,
}

#[derive(Debug)]
pub struct Layer {
    pub(crate) key: NodeKey,
    pub(crate) input_keys: InputKeys,
    pub(crate) module: LayerModule,
}

#[derive(Debug)]
pub enum LayerModule {
    Input,
    Reshape(Vec<i64>),
    Conv2D(nn::Conv2D),
    BatchNorm(nn::BatchNorm),
    Act(Activation),
    Flatten,
    Linear(nn::Linear),
}

impl LayerModule {
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        match self {
            Self::Input => xs.shallow_clone(),
            Self::Reshape(shape) => {
                let shape: Vec<i64> = std::iter::once(-1).chain(shape.iter().cloned()).collect();
                xs.reshape(&shape)
            }
            Self::Conv2D(conv) => conv.forward(xs),
            Self::BatchNorm(bn) => bn.forward_t(xs, train),
            Self::Act(act) => match act {
                Activation::Relu => xs.relu(),
                Activation::Tanh => xs.tanh(),
                Activation::Sigmoid => xs.sigmoid(),
                Activation::Linear => xs.shallow_clone(),
            },
            Self::Flatten => xs.flatten(1, -1),
            Self::Linear(linear) => linear.forward(xs),
        }
    }
}

impl HydraModel {
    /// Build a model from a computation graph.
    pub fn from_graph<'p>(path: impl Borrow<nn::Path<'p>>, orig_graph: &Graph) -> Result<Self> {
        let path = path.borrow();
        let orig_nodes = orig_graph.nodes();

        let input_shape = |input_keys: &InputKeys| -> Result<&Shape> {
            let src_key = input_keys
                .single()
                .ok_or_else(|| format_err!("the layer has no input"))?;
            Ok(&orig_nodes[&src_key].output_shape)
        };
        let size_of = |dim: Dim| -> Result<i64> {
            let size = dim
                .size()
                .ok_or_else(|| format_err!("the dimension must not be inferred"))?;
            Ok(size as i64)
        };

        let layers: IndexMap<_, _> = orig_nodes
            .iter()
            .map(|(&key, node)| -> Result<_> {
                let graph::Node {
                    input_keys, config, ..
                } = node;
                let module_path = path / config.name().as_str();

                let module = match config {
                    config::Module::Input(_) => LayerModule::Input,
                    config::Module::Reshape(config::Reshape { shape, .. }) => {
                        LayerModule::Reshape(shape.iter().map(|&size| size as i64).collect())
                    }
                    config::Module::Conv2D(config::Conv2D {
                        c: out_c,
                        k,
                        s,
                        p,
                        bias,
                        ..
                    }) => {
                        let in_c = match input_shape(input_keys)?.dims() {
                            &[_b, c, _h, _w] => size_of(c)?,
                            _ => bail!("the input of layer '{}' must be 4D", config.name()),
                        };

                        let conv = nn::conv2d(
                            module_path,
                            in_c,
                            *out_c as i64,
                            *k as i64,
                            nn::ConvConfig {
                                stride: *s as i64,
                                padding: *p as i64,
                                bias: *bias,
                                ..Default::default()
                            },
                        );
                        LayerModule::Conv2D(conv)
                    }
                    config::Module::BatchNorm(config::BatchNorm { momentum, eps, .. }) => {
                        let bn_config = nn::BatchNormConfig {
                            momentum: momentum.raw(),
                            eps: eps.raw(),
                            ..Default::default()
                        };

                        let bn = match input_shape(input_keys)?.dims() {
                            &[_b, c] => nn::batch_norm1d(module_path, size_of(c)?, bn_config),
                            &[_b, c, _h, _w] => {
                                nn::batch_norm2d(module_path, size_of(c)?, bn_config)
                            }
                            _ => bail!("the input of layer '{}' must be 2D or 4D", config.name()),
                        };
                        LayerModule::BatchNorm(bn)
                    }
                    config::Module::Act(config::Act { act, .. }) => LayerModule::Act(*act),
                    config::Module::Flatten(_) => LayerModule::Flatten,
                    config::Module::Linear(config::Linear { out, bias, .. }) => {
                        let in_dim = match input_shape(input_keys)?.dims() {
                            &[_b, n] => size_of(n)?,
                            _ => bail!("the input of layer '{}' must be 2D", config.name()),
                        };

                        let linear = nn::linear(
                            module_path,
                            in_dim,
                            *out as i64,
                            nn::LinearConfig {
                                bias: *bias,
                                ..Default::default()
                            },
                        );
                        LayerModule::Linear(linear)
                    }
                };

                let layer = Layer {
                    key,
                    input_keys: *input_keys,
                    module,
                };

                Ok((key, layer))
            })
            .try_collect()?;

        Ok(Self {
            layers,
            input_shape: orig_graph.input_shape().clone(),
            outputs: orig_graph.outputs().clone(),
            device: path.device(),
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn input_shape(&self) -> &Shape {
        &self.input_shape
    }

    /// Reshapes a batch tensor to the input shape of the model.
    pub fn fit_input(&self, input: &Tensor) -> Result<Tensor> {
        let sample_sizes = self
            .input_shape
            .sample_sizes()
            .ok_or_else(|| format_err!("the input shape {} is not fully known", self.input_shape))?;
        let numel: i64 = sample_sizes.iter().map(|&size| size as i64).product();
        let batch_size = input.size().first().cloned().unwrap_or(0);
        ensure!(
            input.numel() as i64 == batch_size * numel,
            "the input of shape {:?} does not fit into model input shape {}",
            input.size(),
            self.input_shape
        );

        let shape: Vec<i64> = std::iter::once(batch_size)
            .chain(sample_sizes.iter().map(|&size| size as i64))
            .collect();
        Ok(input.reshape(&shape))
    }

    /// Run forward pass and return the tensor of each output.
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Result<IndexMap<String, Tensor>> {
        let input = self.fit_input(input)?;
        let mut module_outputs: HashMap<NodeKey, Tensor> = HashMap::new();

        for layer in self.layers.values() {
            let Layer {
                key,
                ref input_keys,
                ref module,
            } = *layer;

            let xs = match *input_keys {
                InputKeys::PlaceHolder => &input,
                InputKeys::Single(src_key) => module_outputs
                    .get(&src_key)
                    .ok_or_else(|| format_err!("node {} runs before its input {}", key, src_key))?,
            };
            let output = module.forward_t(xs, train);
            module_outputs.insert(key, output);
        }

        let outputs = self
            .outputs
            .iter()
            .map(|(name, key)| {
                let output = module_outputs[key].shallow_clone();
                (name.clone(), output)
            })
            .collect();

        Ok(outputs)
    }

    /// Run forward pass on a model with a single output.
    pub fn forward_single_t(&self, input: &Tensor, train: bool) -> Result<Tensor> {
        ensure!(
            self.outputs.len() == 1,
            "the model has {} outputs",
            self.outputs.len()
        );
        let (_, output) = self
            .forward_t(input, train)?
            .into_iter()
            .next()
            .ok_or_else(|| format_err!("the model has no output"))?;
        Ok(output)
    }

    pub fn layers(&self) -> &IndexMap<NodeKey, Layer> {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_config::ZooConfig;

    #[test]
    fn base_model_forward() -> Result<()> {
        let zoo = ZooConfig {
            image_size: 32,
            filters: 1,
        };
        let graph = Graph::from_sequential(zoo.base_model()?)?;
        let vs = nn::VarStore::new(Device::Cpu);
        let model = HydraModel::from_graph(&vs.root(), &graph)?;

        let input = Tensor::rand(&[3, 32, 32], (Kind::Float, Device::Cpu));
        let output = model.forward_single_t(&input, false)?;
        assert_eq!(output.size(), vec![3, 4]);

        let variables = vs.variables();
        assert!(variables.contains_key("conv1a.weight"));
        assert!(variables.contains_key("bn8b.running_mean"));
        assert!(variables.contains_key("dense_out.bias"));

        // wrong image size
        let input = Tensor::rand(&[3, 16, 16], (Kind::Float, Device::Cpu));
        assert!(model.forward_t(&input, false).is_err());
        Ok(())
    }
}
