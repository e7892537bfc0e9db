use crate::{
    combine::combine,
    common::*,
    config::{Config, TrainingConfig},
    target::Target,
    utils::{self, RateCounter},
};

/// The result of training one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOutcome {
    pub target: Target,
    /// The lowest mean epoch loss, if any epoch produced a finite loss.
    pub best_loss: Option<f64>,
    /// The number of epochs after which the model was saved.
    pub num_saves: usize,
}

/// Trains one model and keeps the weights of the epoch with the lowest loss.
pub fn train(config: &Config, target: Target) -> Result<TrainOutcome> {
    let _span = info_span!("train", model = %target).entered();

    let Config {
        ref artifacts,
        ref data,
        device,
        ..
    } = *config;
    let TrainingConfig {
        batch_size,
        steps_per_epoch,
        epochs,
        presence,
        ref variables,
        ref optimizer,
        loss,
    } = *config.training(target);
    let variables = variables.as_deref().unwrap_or_else(|| target.variables());
    let output_dir = artifacts.dir.join(target.artifact_name());

    // init model
    let artifact = load_or_init(config, target)?;
    {
        let output_shape = artifact
            .graph
            .output_shape(model_graph::SEQUENTIAL_OUTPUT)
            .ok_or_else(|| format_err!("the model '{}' must have a single output", target))?;
        ensure!(
            output_shape.sample_sizes() == Some(vec![variables.len()]),
            "the model output shape {} does not fit variables {:?}",
            output_shape,
            variables
        );
    }

    let mut opt = optimizer.adam().build(&artifact.vs, optimizer.lr.raw())?;
    let mut assembler = {
        let seed = utils::renderer_seed(data.seed, target.seed_offset());
        let renderer = SpaceshipRenderer::new(data.renderer.clone(), seed);
        BatchAssembler::with_domain(renderer, data.domain.clone())
    };

    // training
    info!("start training with variables {:?}", variables);
    let mut best_loss: Option<f64> = None;
    let mut num_saves = 0;
    let mut rate_counter = RateCounter::with_second_interval();

    for epoch in 0..epochs.get() {
        let mut loss_sum = 0.0;

        for step in 0..steps_per_epoch.get() {
            let batch = assembler.make_batch(
                batch_size.get(),
                presence,
                data.noise_level.raw(),
                variables,
            )?;
            let TensorBatch { images, labels } = TensorBatch::from_batch(&batch, device)?;

            let pred = artifact.model.forward_single_t(&images, true)?;
            let batch_loss = loss.compute(&pred, &labels)?;
            opt.backward_step(&batch_loss);

            let batch_loss = f64::from(&batch_loss);
            loss_sum += batch_loss;

            rate_counter.add(1.0);
            if let Some(batch_rate) = rate_counter.rate() {
                info!(
                    "epoch: {}\tstep: {}\tloss: {:.5}\t{:.2} batches/s",
                    epoch, step, batch_loss, batch_rate
                );
            }
        }

        let epoch_loss = loss_sum / steps_per_epoch.get() as f64;
        let improved = epoch_loss.is_finite() && best_loss.map_or(true, |best| epoch_loss < best);

        if improved {
            info!(
                "epoch: {}\tloss improved from {:?} to {:.5}, saving model",
                epoch, best_loss, epoch_loss
            );
            artifact.save(&output_dir)?;
            best_loss = Some(epoch_loss);
            num_saves += 1;
        } else {
            info!("epoch: {}\tloss {:.5} did not improve", epoch, epoch_loss);
        }
    }

    Ok(TrainOutcome {
        target,
        best_loss,
        num_saves,
    })
}

/// Trains the base model, then every head, and composes the heads.
pub fn train_all(config: &Config) -> Result<Vec<TrainOutcome>> {
    let outcomes: Vec<_> = Target::ALL
        .iter()
        .map(|&target| train(config, target))
        .try_collect()?;
    combine(config)?;
    Ok(outcomes)
}

/// Resumes from the saved model if any. Otherwise builds a fresh model whose
/// trunk is copied from the saved base model when it exists.
fn load_or_init(config: &Config, target: Target) -> Result<ModelArtifact> {
    let Config {
        ref artifacts,
        model: ref zoo,
        device,
        ..
    } = *config;
    let dir = artifacts.dir.join(target.artifact_name());

    match ModelArtifact::load(&dir, device) {
        Ok(artifact) => {
            info!("resume from '{}'", dir.display());
            return Ok(artifact);
        }
        Err(ArtifactError::Absent { .. }) => {}
        Err(err) => return Err(err.into()),
    }

    let graph = Graph::from_sequential(target.layers(zoo)?)?;
    let mut artifact = ModelArtifact::new(graph, device)?;

    if let Target::Head(_) = target {
        let base_dir = artifacts.dir.join(Target::Base.artifact_name());

        match ModelArtifact::load(&base_dir, device) {
            Ok(base) => {
                let missing = artifact.init_from(&base)?;
                info!(
                    "initialized from '{}', {} parameters are left fresh",
                    base_dir.display(),
                    missing.len()
                );
            }
            Err(ArtifactError::Absent { .. }) => {
                warn!("no base model at '{}', train from scratch", base_dir.display());
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(artifact)
}
