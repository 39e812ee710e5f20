use thiserror::Error;

/// Error type for the chroma-key pipeline.
///
/// The taxonomy is narrow because the core performs no I/O: every failure is
/// a request-validation problem detected before any pixel is mutated.
/// Out-of-range tolerance, smoothness, or erosion strength are not errors;
/// they are clamped so that bad UI input keeps the pipeline total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChromaKeyError {
    /// The key color string is not 6 hex digits with an optional `#` prefix.
    ///
    /// Older chroma-key tools silently fell back to black here; this crate
    /// surfaces the problem instead (see `hex_to_rgb` for the escape hatch).
    #[error("invalid color format {input:?}: expected \"#RRGGBB\" or \"RRGGBB\"")]
    InvalidColorFormat {
        /// The string that failed to parse.
        input: String,
    },

    /// The pixel buffer length does not match the declared dimensions.
    ///
    /// Raised before any mutation; a request never yields a partial result.
    #[error("buffer size mismatch for {width}x{height} image: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        /// `width × height × 4` bytes.
        expected: usize,
        actual: usize,
    },
}
