use anyhow::Result;
use label::HeadRole;
use scene::ObjectPresence;
use train::{config::Config, Target};

#[test]
fn sample_config_test() -> Result<()> {
    let config = Config::open(concat!(env!("CARGO_MANIFEST_DIR"), "/train.json5"))?;

    assert_eq!(config.artifacts.combined_name, "best_combined_model");
    assert_eq!(config.model.image_size, config.data.renderer.image_size());
    assert_eq!(
        config.training(Target::Head(HeadRole::Detection)).presence,
        ObjectPresence::Random
    );
    assert_eq!(
        config.training(Target::Base).presence,
        ObjectPresence::Present
    );
    assert_eq!(config.angle.optimizer.beta2.raw(), 0.999);
    Ok(())
}

#[test]
fn single_sample_batch_is_rejected() -> Result<()> {
    use train::config::{BatchSize, BatchSizeError};

    let text = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/train.json5"))?;
    assert!(json5::from_str::<Config>(&text).is_ok());

    let text = text.replacen("batch_size: 64", "batch_size: 1", 1);
    let err = json5::from_str::<Config>(&text).unwrap_err();
    assert!(err.to_string().contains("batch size must be at least 2"));

    assert_eq!(
        BatchSize::new(0),
        Err(BatchSizeError::TooSmall { size: 0, min: 2 })
    );
    assert_eq!(BatchSize::new(2)?.get(), 2);
    Ok(())
}
