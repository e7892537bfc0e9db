use crate::{common::*, graph::Graph};

/// A trained single-head graph tagged with its role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGraph {
    pub role: HeadRole,
    pub graph: Graph,
}

impl NamedGraph {
    pub fn new(role: HeadRole, graph: Graph) -> Self {
        Self { role, graph }
    }

    /// The shape that the layer at `skip_layers` receives, which all
    /// spliced heads must agree on.
    pub fn input_contract(&self, skip_layers: usize) -> Option<&Shape> {
        let layers = self.graph.sequential_layers()?;
        if layers.len() <= skip_layers {
            return None;
        }
        let &output_key = self.graph.outputs().values().next()?;
        let chain = self.graph.chain(output_key);
        let key = chain.get(skip_layers.checked_sub(1)?)?;
        Some(&self.graph.nodes()[key].output_shape)
    }
}
