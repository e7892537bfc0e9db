//! The wrap-safe angle representation.

use crate::{common::*, error::LabelError};

/// Relative tolerance of the angle round-trip check.
pub const ANGLE_RTOL: f64 = 1e-5;

/// Absolute tolerance of the angle round-trip check.
pub const ANGLE_ATOL: f64 = 1e-8;

/// The `(sin, cos)` pair of an angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleCode {
    pub sin: f64,
    pub cos: f64,
}

impl AngleCode {
    /// Recovers the angle in `[0, 2π)`.
    pub fn decode(&self) -> f64 {
        decode_angle(self.sin, self.cos)
    }
}

/// Maps a `(sin, cos)` pair back to an angle in `[0, 2π)`.
///
/// NaN in either component yields NaN.
pub fn decode_angle(sin: f64, cos: f64) -> f64 {
    let angle = sin.atan2(cos);
    if angle < 0.0 {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Encodes a single angle. See [encode_angles] for the validation rule.
pub fn encode_angle(angle: f64) -> Result<AngleCode, LabelError> {
    let code = AngleCode {
        sin: angle.sin(),
        cos: angle.cos(),
    };
    check_round_trip(0, angle, &code)?;
    Ok(code)
}

/// Encodes a column of angles in radians into `(sin, cos)` columns.
///
/// Every present angle must decode back to itself, which holds exactly for angles
/// in `[0, 2π)`. Rows holding the missing-value sentinel are not checked and
/// produce NaN in both columns.
pub fn encode_angles(angles: ArrayView1<f64>) -> Result<(Array1<f64>, Array1<f64>), LabelError> {
    let sin = angles.mapv(f64::sin);
    let cos = angles.mapv(f64::cos);

    izip!(angles.iter(), sin.iter(), cos.iter())
        .enumerate()
        .try_for_each(|(row, (&angle, &sin, &cos))| {
            check_round_trip(row, angle, &AngleCode { sin, cos })
        })?;

    Ok((sin, cos))
}

fn check_round_trip(row: usize, angle: f64, code: &AngleCode) -> Result<(), LabelError> {
    if angle.is_nan() {
        return Ok(());
    }

    let recovered = code.decode();
    let close = (angle - recovered).abs() <= ANGLE_ATOL + ANGLE_RTOL * recovered.abs();

    if !close {
        return Err(LabelError::InvalidAngle {
            row,
            angle,
            recovered,
        });
    }
    Ok(())
}
