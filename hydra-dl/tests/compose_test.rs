use anyhow::Result;
use hydra_dl::{
    ArtifactError, ComposeError, ComposeInit, CompositeModel, ModelArtifact, COMBINED_MODEL_NAME,
    GRAPH_FILE, SPLICE_FILE, WEIGHTS_FILE,
};
use label::{DomainTable, HeadRole};
use model_config::ZooConfig;
use model_graph::Graph;
use ndarray::Array3;
use std::{fs, path::Path};
use tch::{Device, Kind, Tensor};

fn zoo() -> ZooConfig {
    ZooConfig {
        image_size: 32,
        filters: 1,
    }
}

fn save_head(root: &Path, role: HeadRole) -> Result<ModelArtifact> {
    let graph = Graph::from_sequential(zoo().head_model(role)?)?;
    let artifact = ModelArtifact::new(graph, Device::Cpu)?;
    artifact.save(root.join(role.artifact_name()))?;
    Ok(artifact)
}

#[test]
fn compose_keeps_head_outputs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let heads: Vec<_> = HeadRole::ALL
        .iter()
        .map(|&role| Ok((role, save_head(dir.path(), role)?)))
        .collect::<Result<_>>()?;

    let model = ComposeInit::new(dir.path(), Device::Cpu).compose()?;
    assert_eq!(model.roles().collect::<Vec<_>>(), HeadRole::ALL);

    let input = Tensor::rand(&[4, 32, 32], (Kind::Float, Device::Cpu)) * 2.0 - 1.0;
    let outputs = tch::no_grad(|| model.forward_t(&input, false))?;

    for (role, head) in &heads {
        let expect = tch::no_grad(|| head.model.forward_single_t(&input, false))?;
        let found = &outputs[role];
        assert_eq!(found.size(), vec![4, role.variables().len() as i64]);
        assert!(found.allclose(&expect, 1e-5, 1e-6, false));
    }

    let output_dir = dir.path().join(COMBINED_MODEL_NAME);
    for file in [GRAPH_FILE, WEIGHTS_FILE, SPLICE_FILE] {
        assert!(output_dir.join(file).is_file());
    }

    // the saved model behaves the same
    let loaded = CompositeModel::load(&output_dir, Device::Cpu)?;
    assert_eq!(loaded.heads, model.heads);
    let images = Array3::from_elem((4, 32, 32), 0.25f32);
    let predictions = loaded.predict(images.view(), &DomainTable::default())?;
    let expect = model.predict(images.view(), &DomainTable::default())?;
    assert_eq!(predictions.len(), 4);
    for (found, expect) in predictions.iter().zip(&expect) {
        assert!((found.score - expect.score).abs() < 1e-6);
        assert_eq!(found.is_detected(), expect.is_detected());
    }

    Ok(())
}

#[test]
fn compose_twice_uses_fresh_tokens() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for role in [HeadRole::Detection, HeadRole::Area] {
        save_head(dir.path(), role)?;
    }

    let init = ComposeInit {
        roles: vec![HeadRole::Detection, HeadRole::Area],
        ..ComposeInit::new(dir.path(), Device::Cpu)
    };
    let first = init.clone().compose()?;
    let second = init.compose()?;

    for role in [HeadRole::Detection, HeadRole::Area] {
        assert_ne!(first.heads[&role].token, second.heads[&role].token);
    }
    assert_ne!(
        first.heads[&HeadRole::Detection].token,
        first.heads[&HeadRole::Area].token
    );
    Ok(())
}

#[test]
fn missing_head_fails_every_time() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for role in [HeadRole::Detection, HeadRole::Position, HeadRole::Angle] {
        save_head(dir.path(), role)?;
    }

    for _ in 0..2 {
        let result = ComposeInit::new(dir.path(), Device::Cpu).compose();
        match result {
            Err(ComposeError::MissingArtifact { role, path }) => {
                assert_eq!(role, HeadRole::Area);
                assert_eq!(path, dir.path().join("best_model_area"));
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }
    assert!(!dir.path().join(COMBINED_MODEL_NAME).exists());
    Ok(())
}

#[test]
fn unreadable_head_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for role in HeadRole::ALL {
        save_head(dir.path(), role)?;
    }
    fs::write(
        dir.path().join("best_model_position").join(GRAPH_FILE),
        "not a graph",
    )?;
    fs::remove_file(dir.path().join("best_model_angle").join(WEIGHTS_FILE))?;

    let result = ComposeInit::new(dir.path(), Device::Cpu).compose();
    assert!(matches!(
        result,
        Err(ComposeError::UnreadableArtifact {
            role: HeadRole::Position,
            source: ArtifactError::Unreadable { .. },
        })
    ));

    let result = ModelArtifact::load(dir.path().join("best_model_angle"), Device::Cpu);
    assert!(matches!(result, Err(ArtifactError::Unreadable { .. })));

    let result = ModelArtifact::load(dir.path().join("no_such_model"), Device::Cpu);
    assert!(matches!(result, Err(ArtifactError::Absent { .. })));
    Ok(())
}
