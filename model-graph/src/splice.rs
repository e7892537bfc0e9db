use crate::{
    common::*,
    graph::{Graph, GraphBuilder, NodeKey},
    named::NamedGraph,
};
use thiserror::Error;

/// The number of leading layers (input and reshape) of a trained head that
/// are replaced by the shared input.
pub const DEFAULT_SKIP_LAYERS: usize = 2;

/// The name of the shared input layer of a composite graph.
pub const COMPOSITE_INPUT: &str = "input";

static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(0);

/// A process-unique suffix appended to the layer names of one spliced head.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpliceToken(String);

impl SpliceToken {
    /// Draws a token that was never returned before in this process.
    pub fn next() -> Self {
        let index = NEXT_TOKEN.fetch_add(1, Ordering::SeqCst);
        Self(format!("h{:04}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SpliceToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpliceError {
    #[error("no head graph is given")]
    NoHeads,
    #[error("the head '{0}' is given more than once")]
    DuplicateHead(HeadRole),
    #[error("the head '{role}' is not a single-output chain graph")]
    NotSequential { role: HeadRole },
    #[error("the head '{role}' has {found} layers, but more than {skip} are required")]
    TooFewLayers {
        role: HeadRole,
        found: usize,
        skip: usize,
    },
    #[error("the head '{role}' expects input shape {found}, but {expect} is shared")]
    InputShapeMismatch {
        role: HeadRole,
        expect: Shape,
        found: Shape,
    },
    #[error("unable to rename the layer '{name}' of head '{role}': {reason}")]
    Rename {
        role: HeadRole,
        name: ModuleName,
        reason: String,
    },
    #[error("the layer name '{0}' appears more than once in the composite graph")]
    NameCollision(String),
    #[error("unable to assemble the composite graph: {0}")]
    Assemble(String),
}

/// A head inside a composite graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplicedHead {
    pub token: SpliceToken,
    pub output: NodeKey,
    /// Maps original layer names to the names in the composite graph.
    pub renames: IndexMap<ModuleName, ModuleName>,
}

/// A graph with one shared input and one output per head role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeGraph {
    pub graph: Graph,
    pub heads: IndexMap<HeadRole, SplicedHead>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceInit {
    pub skip_layers: usize,
}

impl Default for SpliceInit {
    fn default() -> Self {
        Self {
            skip_layers: DEFAULT_SKIP_LAYERS,
        }
    }
}

impl SpliceInit {
    /// Re-instantiates the layers of each head after the skipped prefix on
    /// a shared input. Layer names get a fresh token per head, and the
    /// output of each head is named after its role.
    pub fn splice(&self, heads: &[NamedGraph]) -> Result<CompositeGraph, SpliceError> {
        let Self { skip_layers } = *self;

        if heads.is_empty() {
            return Err(SpliceError::NoHeads);
        }

        // check roles and collect layer chains
        let mut chains: IndexMap<HeadRole, Vec<&Module>> = IndexMap::new();

        for head in heads {
            let role = head.role;
            let layers = head
                .graph
                .sequential_layers()
                .ok_or(SpliceError::NotSequential { role })?;

            if layers.len() <= skip_layers {
                return Err(SpliceError::TooFewLayers {
                    role,
                    found: layers.len(),
                    skip: skip_layers,
                });
            }

            if chains.insert(role, layers).is_some() {
                return Err(SpliceError::DuplicateHead(role));
            }
        }

        // agree on the input shape
        let shared_shape = {
            let mut contracts = heads.iter().map(|head| {
                let shape = if skip_layers == 0 {
                    head.graph.input_shape()
                } else {
                    head.input_contract(skip_layers)
                        .ok_or(SpliceError::NotSequential { role: head.role })?
                };
                Ok::<_, SpliceError>((head.role, shape))
            });

            let (_, expect) = contracts.next().ok_or(SpliceError::NoHeads)??;

            for contract in contracts {
                let (role, found) = contract?;
                if found != expect {
                    return Err(SpliceError::InputShapeMismatch {
                        role,
                        expect: expect.clone(),
                        found: found.clone(),
                    });
                }
            }
            expect.clone()
        };

        // rename layers
        let renamed: Vec<(HeadRole, SpliceToken, Vec<Module>)> = chains
            .iter()
            .map(|(&role, layers)| {
                let token = SpliceToken::next();
                let layers: Vec<Module> = layers[skip_layers..]
                    .iter()
                    .map(|layer| {
                        let name = layer.name().suffixed(token.as_str()).map_err(|err| {
                            SpliceError::Rename {
                                role,
                                name: layer.name().clone(),
                                reason: err.to_string(),
                            }
                        })?;
                        Ok::<_, SpliceError>(layer.with_name(name))
                    })
                    .collect::<Result<_, SpliceError>>()?;
                Ok::<_, SpliceError>((role, token, layers))
            })
            .collect::<Result<_, SpliceError>>()?;

        // check name uniqueness
        {
            let mut names: IndexSet<&str> = IndexSet::new();
            names.insert(COMPOSITE_INPUT);

            let all_names = renamed
                .iter()
                .flat_map(|(_, _, layers)| layers.iter().map(|layer| layer.name().as_str()));

            for name in all_names {
                if !names.insert(name) {
                    return Err(SpliceError::NameCollision(name.to_string()));
                }
            }
        }

        // assemble
        let assemble = || -> Result<CompositeGraph> {
            let mut builder = GraphBuilder::new();
            let input_key = builder.input(Input {
                name: ModuleName::new(COMPOSITE_INPUT)?,
                shape: shared_shape.clone(),
            })?;

            let mut spliced_heads = IndexMap::new();

            for ((role, token, layers), orig_layers) in renamed.into_iter().zip(chains.values()) {
                let renames: IndexMap<_, _> = orig_layers[skip_layers..]
                    .iter()
                    .zip(layers.iter())
                    .map(|(orig, new)| (orig.name().clone(), new.name().clone()))
                    .collect();

                let output = layers
                    .into_iter()
                    .try_fold(input_key, |src_key, layer| builder.push(src_key, layer))?;
                builder.output(role.to_string(), output)?;

                debug!("spliced head '{}' with token '{}'", role, token);
                spliced_heads.insert(
                    role,
                    SplicedHead {
                        token,
                        output,
                        renames,
                    },
                );
            }

            Ok(CompositeGraph {
                graph: builder.build()?,
                heads: spliced_heads,
            })
        };

        let composite = assemble().map_err(|err| SpliceError::Assemble(format!("{:#}", err)))?;
        info!(
            "spliced {} heads into a graph of {} nodes",
            composite.heads.len(),
            composite.graph.nodes().len()
        );

        Ok(composite)
    }
}
