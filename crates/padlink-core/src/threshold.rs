//! Trigger/release threshold validation.
//!
//! A pair is valid when `0 < release <= trigger < 1024`. Validation runs
//! before any line is written for a threshold change. Inputs are signed so
//! that negative values are reported as out of range rather than being
//! unrepresentable.

use crate::error::PadError;
use crate::protocol::constants::THRESHOLD_LIMIT;

pub fn validate(trigger: i32, release: i32) -> Result<(), PadError> {
    check_range("trigger", trigger)?;
    check_range("release", release)?;
    if release > trigger {
        return Err(PadError::ThresholdOrderViolation { trigger, release });
    }
    Ok(())
}

fn check_range(name: &'static str, value: i32) -> Result<(), PadError> {
    if value <= 0 || value >= THRESHOLD_LIMIT {
        return Err(PadError::ThresholdOutOfRange { name, value });
    }
    Ok(())
}
