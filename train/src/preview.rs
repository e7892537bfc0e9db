use crate::{common::*, config::Config, target::Target, utils};
use image::{GrayImage, Luma};

/// Renders a batch with the options of a model and writes each image as a
/// PNG file into `output_dir`.
pub fn preview(
    config: &Config,
    target: Target,
    count: usize,
    output_dir: impl AsRef<Path>,
) -> Result<Batch> {
    let output_dir = output_dir.as_ref();
    let Config { ref data, .. } = *config;
    let training = config.training(target);
    let variables = training
        .variables
        .as_deref()
        .unwrap_or_else(|| target.variables());

    let renderer = SpaceshipRenderer::new(
        data.renderer.clone(),
        utils::renderer_seed(data.seed, target.seed_offset()),
    );
    let batch = BatchAssembler::with_domain(renderer, data.domain.clone()).make_batch(
        count,
        training.presence,
        data.noise_level.raw(),
        variables,
    )?;

    fs::create_dir_all(output_dir)?;

    for (index, (image, labels)) in batch
        .images
        .outer_iter()
        .zip(batch.labels.outer_iter())
        .enumerate()
    {
        let (height, width) = image.dim();
        let png = GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let value = image[[y as usize, x as usize]];
            Luma([((value + 1.0) / 2.0 * 255.0).round().clamp(0.0, 255.0) as u8])
        });
        let path = output_dir.join(format!("{}_{:03}.png", target, index));
        png.save(&path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;

        let values = variables
            .iter()
            .zip(labels.iter())
            .map(|(var, value)| format!("{}={:.3}", var, value))
            .join(", ");
        info!("{}: {}", path.display(), values);
    }

    Ok(batch)
}
