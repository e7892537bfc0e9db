use crate::common::*;

/// Flag value of a present object.
pub const PRESENT: f64 = 1.0;

/// Flag value of an absent object.
pub const ABSENT: f64 = -1.0;

/// The missing-value sentinel used by absent measurements.
pub const MISSING: f64 = f64::NAN;

/// Returns true if the value is the missing-value sentinel.
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}

/// Maps one measurement to [ABSENT] if it is missing and [PRESENT] otherwise.
pub fn presence_flag(value: f64) -> f64 {
    if is_missing(value) {
        ABSENT
    } else {
        PRESENT
    }
}

/// Builds the detection column from the column of a presence-indicating variable.
pub fn encode_presence(values: ArrayView1<f64>) -> Array1<f64> {
    values.mapv(presence_flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn presence_flags() {
        let values = array![10.0, MISSING, -3.5, f64::INFINITY, MISSING, 0.0];
        let flags = encode_presence(values.view());
        assert_eq!(flags, array![1.0, -1.0, 1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn empty_column() {
        let values = Array1::<f64>::zeros(0);
        assert_eq!(encode_presence(values.view()).len(), 0);
    }
}
