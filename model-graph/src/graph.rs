use crate::common::*;

pub use graph::*;
pub use builder::*;

mod graph {
    use super::*;

    /// A directed acyclic graph of layers with one input placeholder and
    /// named outputs. Nodes are stored in topological order.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, getset::Getters)]
    #[serde(try_from = "RawGraph", into = "RawGraph")]
    pub struct Graph {
        #[getset(get = "pub")]
        pub(crate) nodes: IndexMap<NodeKey, Node>,
        #[getset(get = "pub")]
        pub(crate) outputs: IndexMap<String, NodeKey>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Node {
        pub input_keys: InputKeys,
        pub output_shape: Shape,
        pub config: Module,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum InputKeys {
        PlaceHolder,
        Single(NodeKey),
    }

    impl InputKeys {
        pub fn single(&self) -> Option<NodeKey> {
            match *self {
                Self::Single(key) => Some(key),
                Self::PlaceHolder => None,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct NodeKey(pub usize);

    impl Display for NodeKey {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            Display::fmt(&self.0, f)
        }
    }

    /// The output name of a graph built from a layer sequence.
    pub const SEQUENTIAL_OUTPUT: &str = "output";

    impl Graph {
        /// Builds a chain graph from a layer list starting with an input layer.
        pub fn from_sequential(layers: impl IntoIterator<Item = Module>) -> Result<Self> {
            let mut layers = layers.into_iter();
            let input = match layers.next() {
                Some(Module::Input(input)) => input,
                Some(layer) => bail!(
                    "the first layer '{}' must be an input layer",
                    layer.name()
                ),
                None => bail!("the layer list is empty"),
            };

            let mut builder = GraphBuilder::new();
            let input_key = builder.input(input)?;
            let last_key = layers.try_fold(input_key, |src_key, layer| builder.push(src_key, layer))?;
            builder.output(SEQUENTIAL_OUTPUT, last_key)?;
            builder.build()
        }

        pub fn open(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let text = fs::read_to_string(path)?;
            let graph: Self = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse graph file '{}'", path.display()))?;
            Ok(graph)
        }

        pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
            let writer = BufWriter::new(fs::File::create(path)?);
            serde_json::to_writer_pretty(writer, self)?;
            Ok(())
        }

        pub fn input_key(&self) -> NodeKey {
            self.nodes.keys().next().copied().unwrap_or(NodeKey(0))
        }

        pub fn input_shape(&self) -> &Shape {
            &self.nodes[&self.input_key()].output_shape
        }

        pub fn output_shape(&self, name: &str) -> Option<&Shape> {
            let key = self.outputs.get(name)?;
            Some(&self.nodes[key].output_shape)
        }

        /// The node keys from the input to the given node.
        pub fn chain(&self, last_key: NodeKey) -> Vec<NodeKey> {
            let mut keys: Vec<_> = iter::successors(Some(last_key), |key| {
                self.nodes.get(key)?.input_keys.single()
            })
            .collect();
            keys.reverse();
            keys
        }

        /// The layers of a graph with exactly one output, in execution order.
        pub fn sequential_layers(&self) -> Option<Vec<&Module>> {
            if self.outputs.len() != 1 {
                return None;
            }
            let &output_key = self.outputs.values().next()?;
            let layers = self
                .chain(output_key)
                .into_iter()
                .map(|key| &self.nodes[&key].config)
                .collect();
            Some(layers)
        }

        pub fn layer_names(&self) -> impl Iterator<Item = &ModuleName> {
            self.nodes.values().map(|node| node.config.name())
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct RawGraph {
        nodes: IndexMap<NodeKey, Node>,
        outputs: IndexMap<String, NodeKey>,
    }

    impl TryFrom<RawGraph> for Graph {
        type Error = Error;

        fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
            let RawGraph { nodes, outputs } = raw;
            check_graph(&nodes, &outputs)?;
            Ok(Self { nodes, outputs })
        }
    }

    impl From<Graph> for RawGraph {
        fn from(graph: Graph) -> Self {
            let Graph { nodes, outputs } = graph;
            Self { nodes, outputs }
        }
    }

    pub(crate) fn check_graph(
        nodes: &IndexMap<NodeKey, Node>,
        outputs: &IndexMap<String, NodeKey>,
    ) -> Result<()> {
        ensure!(!nodes.is_empty(), "the graph has no nodes");
        ensure!(!outputs.is_empty(), "the graph has no outputs");

        let mut names = IndexSet::new();

        for (index, (&key, node)) in nodes.iter().enumerate() {
            let Node {
                input_keys,
                output_shape,
                config,
            } = node;

            let input_shape = match (index, input_keys) {
                (0, InputKeys::PlaceHolder) => {
                    ensure!(config.is_input(), "node {} must be an input layer", key);
                    None
                }
                (0, InputKeys::Single(_)) => bail!("the first node {} must be a placeholder", key),
                (_, InputKeys::PlaceHolder) => {
                    bail!("node {} is a placeholder other than the first node", key)
                }
                (_, &InputKeys::Single(src_key)) => {
                    let src_index = nodes
                        .get_index_of(&src_key)
                        .ok_or_else(|| format_err!("node {} refers to missing node {}", key, src_key))?;
                    ensure!(
                        src_index < index,
                        "node {} refers to a later node {}",
                        key,
                        src_key
                    );
                    ensure!(!config.is_input(), "node {} is an input layer with an input", key);
                    Some(&nodes[src_index].output_shape)
                }
            };

            let expect = config.output_shape(input_shape).ok_or_else(|| {
                format_err!("unable to infer the output shape of layer '{}'", config.name())
            })?;
            ensure!(
                &expect == output_shape,
                "the layer '{}' has output shape {}, but {} is expected",
                config.name(),
                output_shape,
                expect
            );

            let is_new = names.insert(config.name());
            ensure!(is_new, "the layer name '{}' is not unique", config.name());
        }

        for (name, key) in outputs {
            ensure!(
                nodes.contains_key(key),
                "the output '{}' refers to missing node {}",
                name,
                key
            );
        }

        Ok(())
    }
}

mod builder {
    use super::*;

    /// Appends nodes to a graph while inferring their output shapes.
    #[derive(Debug, Default)]
    pub struct GraphBuilder {
        nodes: IndexMap<NodeKey, Node>,
        outputs: IndexMap<String, NodeKey>,
    }

    impl GraphBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn input(&mut self, input: Input) -> Result<NodeKey> {
            ensure!(self.nodes.is_empty(), "the input layer must be added first");
            let output_shape = input.shape.clone();
            Ok(self.insert(Node {
                input_keys: InputKeys::PlaceHolder,
                output_shape,
                config: input.into(),
            }))
        }

        /// Appends a layer fed by the node `src_key`.
        pub fn push(&mut self, src_key: NodeKey, layer: Module) -> Result<NodeKey> {
            ensure!(!layer.is_input(), "the layer '{}' cannot be an input layer", layer.name());
            let input_shape = &self
                .nodes
                .get(&src_key)
                .ok_or_else(|| format_err!("the node {} does not exist", src_key))?
                .output_shape;
            let output_shape = layer.output_shape(Some(input_shape)).ok_or_else(|| {
                format_err!(
                    "the layer '{}' does not accept input shape {}",
                    layer.name(),
                    input_shape
                )
            })?;

            Ok(self.insert(Node {
                input_keys: InputKeys::Single(src_key),
                output_shape,
                config: layer,
            }))
        }

        pub fn output(&mut self, name: impl Into<String>, key: NodeKey) -> Result<()> {
            let name = name.into();
            ensure!(self.nodes.contains_key(&key), "the node {} does not exist", key);
            let prev = self.outputs.insert(name.clone(), key);
            ensure!(prev.is_none(), "the output '{}' is defined twice", name);
            Ok(())
        }

        pub fn build(self) -> Result<Graph> {
            let Self { nodes, outputs } = self;
            graph::check_graph(&nodes, &outputs)?;
            Ok(Graph { nodes, outputs })
        }

        fn insert(&mut self, node: Node) -> NodeKey {
            let key = NodeKey(self.nodes.len());
            self.nodes.insert(key, node);
            key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model_config::ZooConfig;

    #[test]
    fn sequential_graph() {
        let layers = ZooConfig::default().base_model().unwrap();
        let num_layers = layers.len();
        let graph = Graph::from_sequential(layers).unwrap();

        assert_eq!(graph.nodes().len(), num_layers);
        assert_eq!(graph.input_shape(), &Shape::batched(&[200, 200]));
        assert_eq!(
            graph.output_shape(SEQUENTIAL_OUTPUT),
            Some(&Shape::batched(&[4]))
        );
        assert_eq!(graph.sequential_layers().unwrap().len(), num_layers);
    }

    #[test]
    fn graph_json_round_trip() {
        let layers = ZooConfig::default().base_model().unwrap();
        let graph = Graph::from_sequential(layers).unwrap();
        let text = serde_json::to_string(&graph).unwrap();
        let loaded: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(graph, loaded);
    }

    #[test]
    fn reject_duplicated_names() {
        let mut layers = ZooConfig::default().base_model().unwrap();
        let renamed = layers[3].with_name(layers[2].name().clone());
        layers[3] = renamed;
        assert!(Graph::from_sequential(layers).is_err());
    }

    #[test]
    fn reject_forged_shape() {
        let layers = ZooConfig::default().base_model().unwrap();
        let graph = Graph::from_sequential(layers).unwrap();
        let mut value = serde_json::to_value(&graph).unwrap();
        value["nodes"]["1"]["output_shape"] = serde_json::json!(["_", 2, 100, 200]);
        assert!(serde_json::from_value::<Graph>(value).is_err());
    }
}
