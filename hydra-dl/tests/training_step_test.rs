use anyhow::Result;
use hydra_data::BatchAssembler;
use hydra_dl::{LossKind, ModelArtifact, TensorBatch};
use label::HeadRole;
use model_config::ZooConfig;
use model_graph::Graph;
use scene::{ObjectPresence, SpaceshipConfig, SpaceshipRenderer};
use tch::{
    nn::{self, OptimizerConfig as _},
    Device,
};

#[test]
fn one_training_step_on_rendered_batch() -> Result<()> {
    let zoo = ZooConfig {
        image_size: 200,
        filters: 1,
    };
    let artifact = ModelArtifact::new(
        Graph::from_sequential(zoo.head_model(HeadRole::Position)?)?,
        Device::Cpu,
    )?;

    let renderer = SpaceshipRenderer::new(SpaceshipConfig::default(), 7);
    let mut assembler = BatchAssembler::new(renderer);
    let batch = assembler.make_batch(
        4,
        ObjectPresence::Present,
        0.8,
        HeadRole::Position.variables(),
    )?;
    let TensorBatch { images, labels } = TensorBatch::from_batch(&batch, Device::Cpu)?;
    assert_eq!(images.size(), vec![4, 200, 200]);
    assert_eq!(labels.size(), vec![4, 2]);

    let mut opt = nn::Adam::default().build(&artifact.vs, 1e-3)?;
    let pred = artifact.model.forward_single_t(&images, true)?;
    let loss = LossKind::Mse.compute(&pred, &labels)?;
    let loss_value = f64::from(&loss);
    assert!(loss_value.is_finite());
    opt.backward_step(&loss);

    Ok(())
}
