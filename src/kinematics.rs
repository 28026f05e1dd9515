//! Derived motion quantities.

use crate::error::{Error, Result};
use crate::model::EpochRecord;

/// Euclidean magnitude of a velocity vector, in km/s.
///
/// Always non-negative and symmetric in its arguments. Components must be
/// finite; NaN or infinity means an upstream field failed to parse sanely.
pub fn compute_speed(vx: f64, vy: f64, vz: f64) -> Result<f64> {
    for (axis, v) in [("X_DOT", vx), ("Y_DOT", vy), ("Z_DOT", vz)] {
        if !v.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{axis} velocity component is not finite: {v}"
            )));
        }
    }
    Ok((vx * vx + vy * vy + vz * vz).sqrt())
}

/// Instantaneous speed of one state vector.
pub fn record_speed(record: &EpochRecord) -> Result<f64> {
    let (vx, vy, vz) = record.velocity_kms()?;
    compute_speed(vx, vy, vz)
}
