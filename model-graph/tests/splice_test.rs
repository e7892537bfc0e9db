use indexmap::IndexSet;
use label::HeadRole;
use model_config::{ModuleEx as _, ZooConfig};
use model_graph::{Graph, NamedGraph, SpliceInit, COMPOSITE_INPUT};
use tensor_shape::Shape;

fn zoo() -> ZooConfig {
    ZooConfig {
        image_size: 32,
        filters: 1,
    }
}

fn head(role: HeadRole) -> NamedGraph {
    let layers = zoo().head_model(role).unwrap();
    NamedGraph::new(role, Graph::from_sequential(layers).unwrap())
}

#[test]
fn splice_colliding_heads() {
    let heads = [head(HeadRole::Detection), head(HeadRole::Area)];

    // both heads use the same layer names
    let names = |head: &NamedGraph| -> Vec<String> {
        head.graph.layer_names().map(|name| name.to_string()).collect()
    };
    assert_eq!(names(&heads[0]), names(&heads[1]));

    let composite = SpliceInit::default().splice(&heads).unwrap();
    let graph = &composite.graph;

    let unique: IndexSet<_> = graph.layer_names().collect();
    assert_eq!(unique.len(), graph.nodes().len());

    // one shared input, and one chain per head without the input prefix
    let num_layers = heads[0].graph.nodes().len();
    assert_eq!(graph.nodes().len(), 1 + 2 * (num_layers - 2));
    assert_eq!(graph.input_shape(), &Shape::batched(&[1, 32, 32]));
    assert_eq!(
        graph.nodes()[&graph.input_key()].config.name().as_str(),
        COMPOSITE_INPUT
    );

    assert_eq!(
        graph.output_shape("detection"),
        Some(&Shape::batched(&[1]))
    );
    assert_eq!(graph.output_shape("area"), Some(&Shape::batched(&[2])));

    let detection = &composite.heads[&HeadRole::Detection];
    let area = &composite.heads[&HeadRole::Area];
    assert_ne!(detection.token, area.token);
    assert_eq!(detection.renames.len(), num_layers - 2);
    let d1 = &detection.renames["d1"];
    assert_eq!(d1.as_str(), format!("d1-{}", detection.token));
    assert!(!detection.renames.contains_key("reshape"));
}

#[test]
fn splicing_twice_draws_new_tokens() {
    let heads: Vec<_> = HeadRole::ALL.iter().map(|&role| head(role)).collect();
    let first = SpliceInit::default().splice(&heads).unwrap();
    let second = SpliceInit::default().splice(&heads).unwrap();

    let tokens: IndexSet<_> = first
        .heads
        .values()
        .chain(second.heads.values())
        .map(|head| head.token.clone())
        .collect();
    assert_eq!(tokens.len(), 8);

    // the outputs follow the order of the given heads
    let outputs: Vec<_> = first.graph.outputs().keys().cloned().collect();
    assert_eq!(outputs, ["detection", "position", "angle", "area"]);
}

#[test]
fn spliced_layers_keep_their_configs() {
    let heads = [head(HeadRole::Position)];
    let composite = SpliceInit::default().splice(&heads).unwrap();
    let spliced = &composite.heads[&HeadRole::Position];

    let orig_layers = heads[0].graph.sequential_layers().unwrap();
    let output_key = composite.graph.outputs()["position"];
    let new_keys = composite.graph.chain(output_key);

    assert_eq!(orig_layers.len() - 2, new_keys.len() - 1);
    for (orig, key) in orig_layers[2..].iter().zip(&new_keys[1..]) {
        let new = &composite.graph.nodes()[key].config;
        assert_eq!(&spliced.renames[orig.name()], new.name());
        assert_eq!(orig.with_name(new.name().clone()), *new);
    }
}

#[test]
fn composite_graph_file_round_trip() {
    let heads = [head(HeadRole::Angle), head(HeadRole::Position)];
    let composite = SpliceInit::default().splice(&heads).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    composite.graph.save(&path).unwrap();
    let loaded = Graph::open(&path).unwrap();
    assert_eq!(loaded, composite.graph);
}
