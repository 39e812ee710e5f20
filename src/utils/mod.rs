//! Internal utility functions for chromakey.
//!
//! This module contains common functionality used across the matting stages.

use crate::error::ChromaKeyError;

/// Converts a UI-style percentage to a fraction in [0, 1].
///
/// Out-of-range and non-finite inputs are clamped rather than rejected, so
/// the pipeline stays total on bad UI input.
#[inline]
pub fn percentage_to_fraction(percentage: f32) -> f32 {
    if percentage.is_nan() {
        return 0.0;
    }
    (percentage / 100.0).clamp(0.0, 1.0)
}

/// Normalizes an alpha value to [0, 1] using a pre-computed max value.
#[inline]
pub fn normalize_alpha_with_max(alpha: u8, max_value: f32) -> f32 {
    f32::from(alpha) / max_value
}

/// Validates that a raw buffer holds exactly `width × height × 4` bytes.
///
/// The expected size is computed in `u64` so pathological dimensions cannot
/// overflow before the comparison.
pub fn validate_buffer_length(
    width: u32,
    height: u32,
    actual: usize,
) -> Result<(), ChromaKeyError> {
    let expected = u64::from(width) * u64::from(height) * 4;
    if actual as u64 != expected {
        return Err(ChromaKeyError::BufferSizeMismatch {
            width,
            height,
            expected: expected as usize,
            actual,
        });
    }
    Ok(())
}
