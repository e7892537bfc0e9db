use crate::{
    angle::{encode_angle, encode_angles},
    common::*,
    domain::DomainTable,
    error::LabelError,
    presence::{encode_presence, presence_flag, MISSING},
    variable::Variable,
};

pub use encoded::*;
pub use raw::*;

mod raw {
    use super::*;

    /// Pose and extent of the object in a rendered image.
    ///
    /// Positions and extents are in pixels and `yaw` is in radians within `[0, 2π)`.
    /// Every field is the missing-value sentinel when the image holds no object.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct RawLabel {
        pub x: f64,
        pub y: f64,
        pub yaw: f64,
        pub width: f64,
        pub height: f64,
    }

    impl RawLabel {
        pub fn new(x: f64, y: f64, yaw: f64, width: f64, height: f64) -> Self {
            Self {
                x,
                y,
                yaw,
                width,
                height,
            }
        }

        /// The label of an image without object.
        pub fn absent() -> Self {
            Self::new(MISSING, MISSING, MISSING, MISSING, MISSING)
        }

        /// Whether the object exists, judged from the x-coordinate.
        pub fn is_present(&self) -> bool {
            !self.x.is_nan()
        }

        pub fn to_array(&self) -> [f64; 5] {
            [self.x, self.y, self.yaw, self.width, self.height]
        }
    }
}

mod encoded {
    use super::*;

    /// A [RawLabel] extended by the angle code and the detection flag.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct EncodedLabel {
        pub raw: RawLabel,
        pub sin: f64,
        pub cos: f64,
        pub detection: f64,
    }

    impl EncodedLabel {
        pub fn encode(raw: RawLabel) -> Result<Self, LabelError> {
            let code = encode_angle(raw.yaw)?;
            Ok(Self {
                raw,
                sin: code.sin,
                cos: code.cos,
                detection: presence_flag(raw.x),
            })
        }

        pub fn get(&self, var: Variable) -> f64 {
            let RawLabel {
                x,
                y,
                yaw,
                width,
                height,
            } = self.raw;

            match var {
                Variable::X => x,
                Variable::Y => y,
                Variable::Yaw => yaw,
                Variable::Width => width,
                Variable::Height => height,
                Variable::Sin => self.sin,
                Variable::Cos => self.cos,
                Variable::Detection => self.detection,
            }
        }

        pub fn normalize(&self, domain: &DomainTable) -> NormalizedLabel {
            let mut values = [0.0; Variable::COUNT];
            Variable::ALL.iter().for_each(|&var| {
                values[var.index()] = domain.normalizer(var).normalize(self.get(var));
            });
            NormalizedLabel { values }
        }
    }

    /// Every variable of an [EncodedLabel] mapped into `[-1, 1]`.
    ///
    /// Variables of an absent object keep the missing-value sentinel, except for
    /// `detection`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct NormalizedLabel {
        values: [f64; Variable::COUNT],
    }

    impl NormalizedLabel {
        pub fn get(&self, var: Variable) -> f64 {
            self.values[var.index()]
        }

        pub fn select(&self, vars: &[Variable]) -> Vec<f64> {
            vars.iter().map(|&var| self.get(var)).collect()
        }
    }

    /// Encoded labels of a batch, one row per sample and one column per [Variable].
    #[derive(Debug, Clone, PartialEq)]
    pub struct EncodedLabels {
        matrix: Array2<f64>,
    }

    impl EncodedLabels {
        /// Stacks raw labels and derives the angle code and detection columns.
        pub fn encode(labels: &[RawLabel]) -> Result<Self, LabelError> {
            let num_rows = labels.len();
            let mut matrix = Array2::from_elem((num_rows, Variable::COUNT), MISSING);

            labels.iter().enumerate().for_each(|(row, label)| {
                let raw = Array1::from(label.to_array().to_vec());
                matrix.slice_mut(s![row, 0..5]).assign(&raw);
            });

            let (sin, cos) = encode_angles(matrix.column(Variable::Yaw.index()))?;
            let detection = encode_presence(matrix.column(Variable::X.index()));

            matrix.column_mut(Variable::Sin.index()).assign(&sin);
            matrix.column_mut(Variable::Cos.index()).assign(&cos);
            matrix
                .column_mut(Variable::Detection.index())
                .assign(&detection);

            Ok(Self { matrix })
        }

        pub fn num_rows(&self) -> usize {
            self.matrix.nrows()
        }

        pub fn column(&self, var: Variable) -> ArrayView1<'_, f64> {
            self.matrix.column(var.index())
        }

        pub fn row(&self, row: usize) -> EncodedLabel {
            let values = self.matrix.row(row);
            EncodedLabel {
                raw: RawLabel::new(values[0], values[1], values[2], values[3], values[4]),
                sin: values[Variable::Sin.index()],
                cos: values[Variable::Cos.index()],
                detection: values[Variable::Detection.index()],
            }
        }

        /// Normalizes each column with the normalizer of its variable.
        pub fn normalize(&self, domain: &DomainTable) -> NormalizedLabels {
            let mut matrix = self.matrix.clone();
            Variable::ALL.iter().for_each(|&var| {
                let normalized = domain.normalizer(var).normalize_array(self.column(var));
                matrix.column_mut(var.index()).assign(&normalized);
            });
            NormalizedLabels { matrix }
        }
    }

    /// Normalized labels of a batch laid out as [EncodedLabels].
    #[derive(Debug, Clone, PartialEq)]
    pub struct NormalizedLabels {
        matrix: Array2<f64>,
    }

    impl NormalizedLabels {
        pub fn num_rows(&self) -> usize {
            self.matrix.nrows()
        }

        pub fn column(&self, var: Variable) -> ArrayView1<'_, f64> {
            self.matrix.column(var.index())
        }

        /// Builds the label matrix of the requested variables in the given order.
        pub fn select(&self, vars: &[Variable]) -> Array2<f64> {
            Array2::from_shape_fn((self.num_rows(), vars.len()), |(row, col)| {
                self.matrix[[row, vars[col].index()]]
            })
        }
    }
}
