use crate::{
    artifact::{ArtifactError, ModelArtifact},
    common::*,
    tensor::images_to_tensor,
};
use model_graph::{SpliceError, SpliceInit, SplicedHead, DEFAULT_SKIP_LAYERS};
use thiserror::Error;

/// The default directory name of the composite model under the artifact root.
pub const COMBINED_MODEL_NAME: &str = "best_combined_model";
/// The file keeping the splicing tokens and renamed layers of a composite model.
pub const SPLICE_FILE: &str = "splice.json";

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("the '{role}' head artifact is missing at '{}'", path.display())]
    MissingArtifact { role: HeadRole, path: PathBuf },
    #[error("the '{role}' head artifact cannot be read")]
    UnreadableArtifact {
        role: HeadRole,
        #[source]
        source: ArtifactError,
    },
    #[error(transparent)]
    Splice(#[from] SpliceError),
    #[error("unable to transfer parameters of the '{role}' head: {reason}")]
    Transfer { role: HeadRole, reason: String },
    #[error("unable to build or save the composite model: {reason}")]
    Persist { reason: String },
}

/// Composes trained heads found under an artifact root into one model.
#[derive(Debug, Clone)]
pub struct ComposeInit {
    pub artifact_dir: PathBuf,
    pub output_name: String,
    pub roles: Vec<HeadRole>,
    pub skip_layers: usize,
    pub device: Device,
}

impl ComposeInit {
    pub fn new(artifact_dir: impl Into<PathBuf>, device: Device) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
            output_name: COMBINED_MODEL_NAME.to_string(),
            roles: HeadRole::ALL.to_vec(),
            skip_layers: DEFAULT_SKIP_LAYERS,
            device,
        }
    }

    /// Loads each head, splices the graphs, copies the parameters of each
    /// head under the new layer names and saves the result.
    ///
    /// Nothing is written unless every head is loaded and transferred.
    pub fn compose(self) -> Result<CompositeModel, ComposeError> {
        let Self {
            artifact_dir,
            output_name,
            roles,
            skip_layers,
            device,
        } = self;

        // load heads, failing at the first missing one
        let heads: Vec<(HeadRole, ModelArtifact)> = roles
            .iter()
            .map(|&role| {
                let dir = artifact_dir.join(role.artifact_name());
                match ModelArtifact::load(&dir, device) {
                    Ok(artifact) => Ok((role, artifact)),
                    Err(ArtifactError::Absent { path }) => {
                        Err(ComposeError::MissingArtifact { role, path })
                    }
                    Err(source) => Err(ComposeError::UnreadableArtifact { role, source }),
                }
            })
            .collect::<Result<_, _>>()?;

        // splice graphs
        let named: Vec<_> = heads
            .iter()
            .map(|(role, artifact)| NamedGraph::new(*role, artifact.graph.clone()))
            .collect();
        let composite = SpliceInit { skip_layers }.splice(&named)?;

        // build the composite model and transfer parameters
        let artifact = ModelArtifact::new(composite.graph.clone(), device).map_err(|err| {
            ComposeError::Persist {
                reason: format!("{:#}", err),
            }
        })?;
        let mut dst_vars = artifact.vs.variables();

        for (role, head) in &heads {
            let spliced = &composite.heads[role];
            transfer_parameters(&head.vs, &mut dst_vars, &spliced.renames).map_err(|err| {
                ComposeError::Transfer {
                    role: *role,
                    reason: format!("{:#}", err),
                }
            })?;
        }

        if let Some(name) = dst_vars.keys().sorted().next() {
            return Err(ComposeError::Persist {
                reason: format!("the parameter '{}' has no source", name),
            });
        }

        // persist
        let model = CompositeModel {
            heads: composite.heads,
            artifact,
        };
        let output_dir = artifact_dir.join(&output_name);
        model.save(&output_dir).map_err(|err| ComposeError::Persist {
            reason: format!("{:#}", err),
        })?;
        info!(
            "composed {} heads into '{}'",
            heads.len(),
            output_dir.display()
        );

        Ok(model)
    }
}

/// Copies each source parameter `<layer>.<param>` to `<renamed layer>.<param>`
/// and removes the written entries from `dst_vars`.
fn transfer_parameters(
    src_vs: &nn::VarStore,
    dst_vars: &mut HashMap<String, Tensor>,
    renames: &IndexMap<model_config::ModuleName, model_config::ModuleName>,
) -> Result<()> {
    for (src_name, src) in src_vs.variables() {
        let (layer, param) = src_name
            .split_once('.')
            .ok_or_else(|| format_err!("invalid parameter name '{}'", src_name))?;
        let new_layer = renames
            .get(layer)
            .ok_or_else(|| format_err!("the layer '{}' is not spliced", layer))?;
        let dst_name = format!("{}.{}", new_layer, param);
        let mut dst = dst_vars
            .remove(&dst_name)
            .ok_or_else(|| format_err!("the parameter '{}' does not exist", dst_name))?;

        ensure!(
            src.size() == dst.size(),
            "the parameter '{}' has shape {:?}, but '{}' has {:?}",
            src_name,
            src.size(),
            dst_name,
            dst.size()
        );
        tch::no_grad(|| dst.copy_(&src));
    }

    Ok(())
}

/// A multi-head model made of spliced heads.
#[derive(Debug)]
pub struct CompositeModel {
    pub heads: IndexMap<HeadRole, SplicedHead>,
    pub artifact: ModelArtifact,
}

impl CompositeModel {
    /// Loads a saved composite model.
    pub fn load(dir: impl AsRef<Path>, device: Device) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let artifact = ModelArtifact::load(dir, device)?;

        let splice_file = dir.join(SPLICE_FILE);
        let heads = fs::read_to_string(&splice_file)
            .map_err(Error::from)
            .and_then(|text| Ok(serde_json::from_str(&text)?))
            .map_err(|err| ArtifactError::Unreadable {
                path: dir.to_owned(),
                reason: format!("{}: {}", splice_file.display(), err),
            })?;

        Ok(Self { heads, artifact })
    }

    fn save(&self, dir: &Path) -> Result<()> {
        self.artifact.save(dir)?;
        let writer = io::BufWriter::new(fs::File::create(dir.join(SPLICE_FILE))?);
        serde_json::to_writer_pretty(writer, &self.heads)?;
        Ok(())
    }

    pub fn roles(&self) -> impl Iterator<Item = HeadRole> + '_ {
        self.heads.keys().cloned()
    }

    pub fn forward_t(&self, input: &Tensor, train: bool) -> Result<IndexMap<HeadRole, Tensor>> {
        self.artifact
            .model
            .forward_t(input, train)?
            .into_iter()
            .map(|(name, output)| -> Result<_> {
                let role: HeadRole = name
                    .parse()
                    .map_err(|_| format_err!("'{}' is not a head role", name))?;
                Ok((role, output))
            })
            .try_collect()
    }

    /// Predicts decoded labels from images with values in `[-1, 1]`.
    pub fn predict(
        &self,
        images: ArrayView3<'_, f32>,
        domain: &DomainTable,
    ) -> Result<Vec<Prediction>> {
        let model = &self.artifact.model;
        let input = images_to_tensor(images, model.device())?;
        let outputs = tch::no_grad(|| self.forward_t(&input, false))?;
        let batch_size = images.shape()[0];

        let columns = |role: HeadRole| -> Result<Vec<Vec<f64>>> {
            let output = outputs
                .get(&role)
                .ok_or_else(|| format_err!("the model has no '{}' output", role))?;
            let output = output.to_device(Device::Cpu).to_kind(Kind::Double);
            let num_cols = role.variables().len();
            ensure!(
                output.size() == [batch_size as i64, num_cols as i64],
                "the '{}' output has shape {:?}",
                role,
                output.size()
            );
            let values = Vec::<f64>::from(&output.view([-1]));
            Ok(values.chunks(num_cols).map(|row| row.to_vec()).collect())
        };

        let detection = columns(HeadRole::Detection)?;
        let position = columns(HeadRole::Position)?;
        let angle = columns(HeadRole::Angle)?;
        let area = columns(HeadRole::Area)?;

        let predictions = izip!(detection, position, angle, area)
            .map(|(detection, position, angle, area)| {
                Prediction::decode(
                    domain,
                    detection[0],
                    [position[0], position[1]],
                    [angle[0], angle[1]],
                    [area[0], area[1]],
                )
            })
            .collect();
        Ok(predictions)
    }
}
