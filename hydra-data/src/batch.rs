use crate::{common::*, error::BatchError};

/// A supervised batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Images of shape `(batch_size, height, width)` with values in `[-1, 1]`.
    pub images: Array3<f32>,
    /// Labels of shape `(batch_size, variables.len())`.
    pub labels: Array2<f32>,
    /// The label variables in column order.
    pub variables: Vec<Variable>,
}

impl Batch {
    pub fn batch_size(&self) -> usize {
        self.images.len_of(Axis(0))
    }

    /// Checks the batch invariants.
    ///
    /// The missing-value sentinel is allowed in label columns. It only appears in
    /// columns other than `detection` when the batch contains absent objects.
    pub fn validate(&self, batch_size: usize) -> Result<(), BatchError> {
        let Self {
            images,
            labels,
            variables,
        } = self;

        if images.iter().any(|value| !(-1.0..=1.0).contains(value)) {
            let num_nan = images.iter().filter(|value| value.is_nan()).count();
            let (min, max) = images
                .iter()
                .filter(|value| !value.is_nan())
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &value| {
                    (min.min(value), max.max(value))
                });
            return Err(BatchError::ImageRange { min, max, num_nan });
        }

        let expect = (batch_size, variables.len());
        let found = labels.dim();
        if images.len_of(Axis(0)) != batch_size || found != expect {
            return Err(BatchError::Shape { expect, found });
        }

        let outlier = labels.indexed_iter().find(|(_, value)| {
            !value.is_nan() && !(-1.0..=1.0).contains(*value)
        });
        if let Some(((row, col), &value)) = outlier {
            return Err(BatchError::Range {
                row,
                variable: variables[col],
                value,
            });
        }

        Ok(())
    }
}

/// Assembles batches from a renderer.
///
/// The assembler holds no state across batches besides the renderer's randomness.
#[derive(Debug, Clone)]
pub struct BatchAssembler<R> {
    renderer: R,
    domain: DomainTable,
}

impl<R> BatchAssembler<R>
where
    R: Renderer,
{
    pub fn new(renderer: R) -> Self {
        Self::with_domain(renderer, DomainTable::default())
    }

    pub fn with_domain(renderer: R, domain: DomainTable) -> Self {
        Self { renderer, domain }
    }

    pub fn domain(&self) -> &DomainTable {
        &self.domain
    }

    /// Renders `batch_size` scenes and builds the images and the label matrix of the
    /// requested variables, in the requested order.
    pub fn make_batch(
        &mut self,
        batch_size: usize,
        presence: ObjectPresence,
        noise_level: f64,
        variables: &[Variable],
    ) -> Result<Batch, BatchError> {
        let [height, width] = self.renderer.image_shape();
        let mut images = Array3::<f32>::zeros((batch_size, height, width));
        let mut raw_labels = Vec::with_capacity(batch_size);

        for index in 0..batch_size {
            let Scene { image, label } = self.renderer.render(presence, noise_level);

            let (found_h, found_w) = image.dim();
            if [found_h, found_w] != [height, width] {
                return Err(BatchError::ImageShape {
                    index,
                    expect: [height, width],
                    found: [found_h, found_w],
                });
            }

            images
                .index_axis_mut(Axis(0), index)
                .assign(&image.mapv(|value| 2.0 * value - 1.0));
            raw_labels.push(label);
        }

        let labels = EncodedLabels::encode(&raw_labels)?
            .normalize(&self.domain)
            .select(variables)
            .mapv(|value| value as f32);

        let batch = Batch {
            images,
            labels,
            variables: variables.to_vec(),
        };
        batch.validate(batch_size)?;

        debug!(
            "assembled batch of {} samples with variables {:?}",
            batch_size, variables
        );

        Ok(batch)
    }

    /// An endless iterator of batches with fixed options.
    pub fn batches<'a>(
        &'a mut self,
        batch_size: usize,
        presence: ObjectPresence,
        noise_level: f64,
        variables: &'a [Variable],
    ) -> impl Iterator<Item = Result<Batch, BatchError>> + 'a
    where
        R: 'a,
    {
        std::iter::repeat_with(move || {
            self.make_batch(batch_size, presence, noise_level, variables)
        })
    }
}

/// Builds one batch with the default domain table.
pub fn make_batch<R>(
    renderer: R,
    batch_size: usize,
    presence: ObjectPresence,
    noise_level: f64,
    variables: &[Variable],
) -> Result<Batch, BatchError>
where
    R: Renderer,
{
    BatchAssembler::new(renderer).make_batch(batch_size, presence, noise_level, variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn batch(images: Array3<f32>, labels: Array2<f32>, variables: &[Variable]) -> Batch {
        Batch {
            images,
            labels,
            variables: variables.to_vec(),
        }
    }

    #[test]
    fn validate_image_range() {
        let batch = batch(
            Array3::from_elem((2, 3, 3), 1.5),
            Array2::zeros((2, 1)),
            &[Variable::X],
        );
        assert_eq!(
            batch.validate(2),
            Err(BatchError::ImageRange {
                min: 1.5,
                max: 1.5,
                num_nan: 0
            })
        );
    }

    #[test]
    fn validate_image_with_nan() {
        let mut images = Array3::zeros((2, 3, 3));
        images[[1, 2, 0]] = f32::NAN;
        images[[0, 0, 0]] = -0.5;
        let batch = batch(images, Array2::zeros((2, 1)), &[Variable::X]);

        let err = batch.validate(2).unwrap_err();
        assert_eq!(
            err,
            BatchError::ImageRange {
                min: -0.5,
                max: 0.0,
                num_nan: 1
            }
        );
        assert!(err.to_string().contains("1 NaN"));
    }

    #[test]
    fn validate_shape() {
        let batch = batch(
            Array3::zeros((2, 3, 3)),
            Array2::zeros((2, 1)),
            &[Variable::X, Variable::Y],
        );
        assert_eq!(
            batch.validate(2),
            Err(BatchError::Shape {
                expect: (2, 2),
                found: (2, 1)
            })
        );

        let batch = self::batch(
            Array3::zeros((2, 3, 3)),
            Array2::zeros((2, 1)),
            &[Variable::X],
        );
        assert!(matches!(batch.validate(3), Err(BatchError::Shape { .. })));
    }

    #[test]
    fn validate_label_range() {
        let batch = batch(
            Array3::zeros((2, 3, 3)),
            array![[0.0, 0.5], [f32::NAN, -1.25]],
            &[Variable::Sin, Variable::Cos],
        );
        assert_eq!(
            batch.validate(2),
            Err(BatchError::Range {
                row: 1,
                variable: Variable::Cos,
                value: -1.25
            })
        );
    }
}
