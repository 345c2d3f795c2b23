//! Shot cut range rules.

use crate::error::CoreError;

/// Validate a shot's cut range. Either bound may be unset.
pub fn validate_cut_range(cut_in: Option<i32>, cut_out: Option<i32>) -> Result<(), CoreError> {
    if cut_in.is_some_and(|v| v < 0) || cut_out.is_some_and(|v| v < 0) {
        return Err(CoreError::Validation(
            "Cut in/out frames must not be negative".into(),
        ));
    }
    if let (Some(cut_in), Some(cut_out)) = (cut_in, cut_out) {
        if cut_in > cut_out {
            return Err(CoreError::Validation(format!(
                "cut_in ({cut_in}) must not be greater than cut_out ({cut_out})"
            )));
        }
    }
    Ok(())
}

/// Inclusive frame count of a cut range, when both bounds are set.
///
/// Widened to `i64`: `0..=i32::MAX` holds one more frame than `i32` can.
pub fn frame_count(cut_in: Option<i32>, cut_out: Option<i32>) -> Option<i64> {
    match (cut_in, cut_out) {
        (Some(cut_in), Some(cut_out)) if cut_out >= cut_in => {
            Some(i64::from(cut_out) - i64::from(cut_in) + 1)
        }
        _ => None,
    }
}
