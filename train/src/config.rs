//! Training program configuration format.

use crate::{common::*, target::Target};

pub use artifacts::*;
pub use data::*;
pub use training::*;

/// The main training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub model: ZooConfig,
    pub data: DataConfig,
    /// The device where models are trained.
    #[serde(with = "tch_serde::serde_device")]
    pub device: Device,
    pub base: TrainingConfig,
    pub detection: TrainingConfig,
    pub position: TrainingConfig,
    pub angle: TrainingConfig,
    pub area: TrainingConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }

    pub fn training(&self, target: Target) -> &TrainingConfig {
        match target {
            Target::Base => &self.base,
            Target::Head(HeadRole::Detection) => &self.detection,
            Target::Head(HeadRole::Position) => &self.position,
            Target::Head(HeadRole::Angle) => &self.angle,
            Target::Head(HeadRole::Area) => &self.area,
        }
    }
}

mod artifacts {
    use super::*;

    /// Where trained models are kept.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ArtifactsConfig {
        /// The directory holding one sub-directory per trained model.
        pub dir: PathBuf,
        /// The directory name of the composite model.
        #[serde(default = "default_combined_name")]
        pub combined_name: String,
    }

    fn default_combined_name() -> String {
        hydra_dl::COMBINED_MODEL_NAME.to_string()
    }
}

mod data {
    use super::*;

    /// Scene generation options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DataConfig {
        /// The scale of uniform noise added to images.
        pub noise_level: R64,
        /// If set, renderers are seeded deterministically.
        pub seed: Option<u64>,
        #[serde(default)]
        pub renderer: SpaceshipConfig,
        #[serde(default)]
        pub domain: DomainTable,
    }
}

mod training {
    use super::*;

    /// The training options of one model.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TrainingConfig {
        pub batch_size: BatchSize,
        pub steps_per_epoch: NonZeroUsize,
        pub epochs: NonZeroUsize,
        /// Whether scenes contain the object. Defaults to always present.
        #[serde(default = "default_presence")]
        pub presence: ObjectPresence,
        /// Overrides the label variables of the model.
        pub variables: Option<Vec<Variable>>,
        pub optimizer: OptimizerConfig,
        #[serde(default)]
        pub loss: LossKind,
    }

    /// The number of samples per training step.
    ///
    /// Batch normalization layers in training mode need at least two samples.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(try_from = "usize", into = "usize")]
    pub struct BatchSize(usize);

    impl BatchSize {
        pub const MIN: usize = 2;

        pub fn new(size: usize) -> Result<Self, BatchSizeError> {
            if size < Self::MIN {
                return Err(BatchSizeError::TooSmall {
                    size,
                    min: Self::MIN,
                });
            }
            Ok(Self(size))
        }

        pub fn get(&self) -> usize {
            self.0
        }
    }

    impl TryFrom<usize> for BatchSize {
        type Error = BatchSizeError;

        fn try_from(size: usize) -> Result<Self, Self::Error> {
            Self::new(size)
        }
    }

    impl From<BatchSize> for usize {
        fn from(size: BatchSize) -> Self {
            size.0
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum BatchSizeError {
        #[error("batch size must be at least {min}, but get {size}")]
        TooSmall { size: usize, min: usize },
    }

    /// Adam optimizer options.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct OptimizerConfig {
        pub lr: R64,
        #[serde(default = "default_beta1")]
        pub beta1: R64,
        #[serde(default = "default_beta2")]
        pub beta2: R64,
        #[serde(default = "default_weight_decay")]
        pub weight_decay: R64,
    }

    impl OptimizerConfig {
        /// A new Adam configuration. Optimizers are built per training run
        /// from this.
        pub fn adam(&self) -> nn::Adam {
            nn::Adam {
                beta1: self.beta1.raw(),
                beta2: self.beta2.raw(),
                wd: self.weight_decay.raw(),
            }
        }
    }

    fn default_presence() -> ObjectPresence {
        ObjectPresence::Present
    }

    fn default_beta1() -> R64 {
        r64(0.9)
    }

    fn default_beta2() -> R64 {
        r64(0.999)
    }

    fn default_weight_decay() -> R64 {
        r64(0.0)
    }
}
