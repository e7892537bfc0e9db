use approx::assert_abs_diff_eq;
use hydra_data::{make_batch, BatchAssembler, BatchError};
use label::{RawLabel, Variable};
use ndarray::Array2;
use scene::{ObjectPresence, Renderer, Scene, SpaceshipConfig, SpaceshipRenderer};

fn renderer(seed: u64) -> SpaceshipRenderer {
    SpaceshipRenderer::new(SpaceshipConfig::default(), seed)
}

#[test]
fn position_batch() {
    let batch = make_batch(
        renderer(1),
        32,
        ObjectPresence::Present,
        0.8,
        &[Variable::X, Variable::Y],
    )
    .unwrap();

    assert_eq!(batch.images.shape(), &[32, 200, 200]);
    assert!(batch.images.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    assert_eq!(batch.images.iter().cloned().fold(f32::INFINITY, f32::min), -1.0);
    assert_eq!(batch.labels.shape(), &[32, 2]);
    assert!(batch.labels.iter().all(|&v| (-1.0..=1.0).contains(&v)));
    assert_eq!(batch.batch_size(), 32);
}

#[test]
fn absent_objects_are_flagged() {
    let batch = make_batch(
        renderer(2),
        16,
        ObjectPresence::Absent,
        0.8,
        &[Variable::Detection],
    )
    .unwrap();

    assert_eq!(batch.labels.shape(), &[16, 1]);
    assert!(batch.labels.iter().all(|&v| v == -1.0));
}

#[test]
fn random_presence_mixes_flags() {
    let mut assembler = BatchAssembler::new(renderer(3));
    let batch = assembler
        .make_batch(
            64,
            ObjectPresence::Random,
            0.8,
            &[Variable::Detection, Variable::Width],
        )
        .unwrap();

    let flags = batch.labels.column(0);
    assert!(flags.iter().any(|&v| v == 1.0));
    assert!(flags.iter().any(|&v| v == -1.0));

    // widths of absent objects keep the missing-value sentinel
    batch.labels.rows().into_iter().for_each(|row| {
        assert_eq!(row[0] < 0.0, row[1].is_nan());
    });
}

#[test]
fn columns_follow_requested_order() {
    let variables = [Variable::Cos, Variable::Detection, Variable::Sin];
    let mut assembler = BatchAssembler::new(renderer(4));
    let batch = assembler
        .make_batch(8, ObjectPresence::Present, 0.5, &variables)
        .unwrap();

    assert_eq!(batch.variables, variables);
    batch.labels.rows().into_iter().for_each(|row| {
        assert_eq!(row[1], 1.0);
        assert_abs_diff_eq!(row[0] * row[0] + row[2] * row[2], 1.0, epsilon = 1e-5);
    });
}

#[test]
fn batches_are_independent_draws() {
    let mut assembler = BatchAssembler::new(renderer(5));
    let batches: Vec<_> = assembler
        .batches(4, ObjectPresence::Present, 0.8, &[Variable::X])
        .take(2)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_ne!(batches[0].labels, batches[1].labels);
}

/// A renderer producing one fixed scene.
struct FixedRenderer {
    image: Array2<f32>,
    label: RawLabel,
}

impl Renderer for FixedRenderer {
    fn image_shape(&self) -> [usize; 2] {
        let (h, w) = self.image.dim();
        [h, w]
    }

    fn render(&mut self, _presence: ObjectPresence, _noise_level: f64) -> Scene {
        Scene {
            image: self.image.clone(),
            label: self.label,
        }
    }
}

#[test]
fn invalid_angle_aborts_batch() {
    let renderer = FixedRenderer {
        image: Array2::zeros((8, 8)),
        label: RawLabel::new(100.0, 100.0, 7.5, 20.0, 30.0),
    };
    let err = make_batch(renderer, 4, ObjectPresence::Present, 0.0, &[Variable::Sin]).unwrap_err();
    assert!(matches!(err, BatchError::InvalidAngle { row: 0, .. }));
}

#[test]
fn out_of_range_image_aborts_batch() {
    let renderer = FixedRenderer {
        image: Array2::from_elem((8, 8), 1.5),
        label: RawLabel::absent(),
    };
    let err = make_batch(renderer, 2, ObjectPresence::Absent, 0.0, &[Variable::Detection])
        .unwrap_err();
    assert_eq!(
        err,
        BatchError::ImageRange {
            min: 2.0,
            max: 2.0,
            num_nan: 0
        }
    );
}

#[test]
fn empty_variable_list() {
    let batch = make_batch(renderer(6), 3, ObjectPresence::Present, 0.8, &[]).unwrap();
    assert_eq!(batch.labels.shape(), &[3, 0]);
}
