use crate::{common::*, config::Config};
use hydra_dl::{ComposeInit, CompositeModel};

/// Composes the trained heads into one model under the artifact directory.
pub fn combine(config: &Config) -> Result<CompositeModel> {
    let _span = info_span!("combine").entered();

    let init = ComposeInit {
        output_name: config.artifacts.combined_name.clone(),
        ..ComposeInit::new(&config.artifacts.dir, config.device)
    };
    let model = init.compose()?;

    for (role, head) in &model.heads {
        info!(
            "head '{}' spliced with token '{}' ({} layers)",
            role,
            head.token,
            head.renames.len()
        );
    }

    Ok(model)
}
