use crate::{angle::decode_angle, domain::DomainTable, labels::RawLabel, variable::Variable};

/// A decoded model prediction in the units of [RawLabel].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// The raw detection score in `[-1, 1]`.
    pub score: f64,
    /// The decoded label. It is [RawLabel::absent] when the score is not positive.
    pub label: RawLabel,
}

impl Prediction {
    /// Decodes normalized head outputs.
    ///
    /// `position` is `(x, y)`, `angle` is `(sin, cos)` and `area` is
    /// `(width, height)`, all in normalized units.
    pub fn decode(
        domain: &DomainTable,
        detection: f64,
        position: [f64; 2],
        angle: [f64; 2],
        area: [f64; 2],
    ) -> Self {
        let detection = domain.normalizer(Variable::Detection).denormalize(detection);

        if !(detection > 0.0) {
            return Self {
                score: detection,
                label: RawLabel::absent(),
            };
        }

        let restore = |var: Variable, value: f64| domain.normalizer(var).denormalize(value);
        let [x, y] = position;
        let [sin, cos] = angle;
        let [width, height] = area;

        Self {
            score: detection,
            label: RawLabel::new(
                restore(Variable::X, x),
                restore(Variable::Y, y),
                decode_angle(restore(Variable::Sin, sin), restore(Variable::Cos, cos)),
                restore(Variable::Width, width),
                restore(Variable::Height, height),
            ),
        }
    }

    pub fn is_detected(&self) -> bool {
        self.label.is_present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::EncodedLabel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn decode_normalized_label() {
        let domain = DomainTable::default();
        let raw = RawLabel::new(42.0, 133.0, 4.0, 30.0, 60.0);
        let normalized = EncodedLabel::encode(raw).unwrap().normalize(&domain);
        let get = |var| normalized.get(var);

        let prediction = Prediction::decode(
            &domain,
            get(Variable::Detection),
            [get(Variable::X), get(Variable::Y)],
            [get(Variable::Sin), get(Variable::Cos)],
            [get(Variable::Width), get(Variable::Height)],
        );

        assert!(prediction.is_detected());
        let decoded = prediction.label.to_array();
        raw.to_array()
            .iter()
            .zip(decoded.iter())
            .for_each(|(lhs, rhs)| assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-9));
    }

    #[test]
    fn negative_score_is_absent() {
        let prediction = Prediction::decode(
            &DomainTable::default(),
            -0.2,
            [0.0, 0.0],
            [0.0, 1.0],
            [0.0, 0.0],
        );
        assert!(!prediction.is_detected());
        assert_eq!(prediction.score, -0.2);
    }
}
