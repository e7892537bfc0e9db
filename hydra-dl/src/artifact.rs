use crate::{common::*, model::HydraModel};
use thiserror::Error;

/// The graph file name inside an artifact directory.
pub const GRAPH_FILE: &str = "graph.json";
/// The weights file name inside an artifact directory.
pub const WEIGHTS_FILE: &str = "weights.ot";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtifactError {
    #[error("no model artifact found at '{}'", path.display())]
    Absent { path: PathBuf },
    #[error("the model artifact at '{}' is unreadable: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
}

/// A trained model on disk: the graph in JSON and the weights of its
/// variable store.
#[derive(Debug)]
pub struct ModelArtifact {
    pub graph: Graph,
    pub vs: nn::VarStore,
    pub model: HydraModel,
}

impl ModelArtifact {
    /// Creates a model with freshly initialized parameters.
    pub fn new(graph: Graph, device: Device) -> Result<Self> {
        let vs = nn::VarStore::new(device);
        let model = HydraModel::from_graph(&vs.root(), &graph)?;
        Ok(Self { graph, vs, model })
    }

    /// Loads an artifact directory. A directory without a graph file is
    /// reported as absent, and any other failure as unreadable.
    pub fn load(dir: impl AsRef<Path>, device: Device) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let unreadable = |reason: String| ArtifactError::Unreadable {
            path: dir.to_owned(),
            reason,
        };

        let graph_file = dir.join(GRAPH_FILE);
        let text = match fs::read_to_string(&graph_file) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactError::Absent {
                    path: dir.to_owned(),
                });
            }
            Err(err) => return Err(unreadable(format!("{}: {}", graph_file.display(), err))),
        };
        let graph: Graph = serde_json::from_str(&text)
            .map_err(|err| unreadable(format!("{}: {}", graph_file.display(), err)))?;

        let weights_file = dir.join(WEIGHTS_FILE);
        if !weights_file.is_file() {
            return Err(unreadable(format!(
                "{} does not exist",
                weights_file.display()
            )));
        }

        let mut artifact =
            Self::new(graph, device).map_err(|err| unreadable(format!("{:#}", err)))?;
        artifact
            .vs
            .load(&weights_file)
            .map_err(|err| unreadable(format!("{}: {}", weights_file.display(), err)))?;

        debug!("loaded model artifact '{}'", dir.display());
        Ok(artifact)
    }

    /// Writes the graph and the weights into a directory, creating it if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
        self.graph.save(dir.join(GRAPH_FILE))?;
        self.vs.save(dir.join(WEIGHTS_FILE))?;
        info!("saved model artifact '{}'", dir.display());
        Ok(())
    }

    /// Initializes the parameters that have the same names in another
    /// artifact. Returns the names of parameters left untouched.
    pub fn init_from(&mut self, other: &ModelArtifact) -> Result<Vec<String>> {
        let src_vars = other.vs.variables();
        let mut missing = vec![];

        for (name, mut dst) in self.vs.variables() {
            match src_vars.get(&name) {
                Some(src) => {
                    ensure!(
                        src.size() == dst.size(),
                        "the parameter '{}' has shape {:?}, but the source has {:?}",
                        name,
                        dst.size(),
                        src.size()
                    );
                    tch::no_grad(|| dst.copy_(src));
                }
                None => missing.push(name),
            }
        }

        missing.sort();
        Ok(missing)
    }
}
