use image::{ImageBuffer, Rgba};
use imageproc::definitions::Image;
use tracing::debug;

use crate::chromakey::color_model::{GreenScreenMode, KeyColor};
use crate::chromakey::connected_matte::ConnectedMatteExt;
use crate::chromakey::erosion::ErodeAlphaExt;
use crate::chromakey::global_matte::{FeatherBand, GlobalMatteExt};
use crate::chromakey::premultiply::PremultiplyAlphaExt;
use crate::error::ChromaKeyError;
use crate::utils::{percentage_to_fraction, validate_buffer_length};

/// Background-selection strategy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalMode {
    /// Feathered whole-image classification.
    #[default]
    Global,
    /// Border-seeded connected flood fill with a hard edge.
    Flood,
}

/// A raw RGBA pixel buffer: row-major, origin top-left, `width × height × 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImageData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// One background-removal request.
///
/// The buffer is owned by the request and moves through the pipeline without
/// being copied; the response hands the same storage back.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalRequest {
    /// Opaque correlation token, echoed back in the response.
    pub id: u64,
    pub image: RawImageData,
    pub mode: RemovalMode,
    /// Key color as `"#RRGGBB"` or `"RRGGBB"`, case-insensitive.
    /// `#00FF00` selects the specialized green-screen classifier.
    pub target_color: String,
    /// Percentage in [0, 100]; out-of-range values are clamped.
    pub color_tolerance: f32,
    /// Feather width percentage in [0, 100]; only used by [`RemovalMode::Global`].
    pub smoothness: f32,
    /// Erosion iteration count; 0 disables erosion.
    pub erode_strength: u32,
}

/// The processed buffer, same dimensions and storage as the request's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalResponse {
    pub id: u64,
    pub image: RawImageData,
}

/// Runs the full matting pipeline on one request.
///
/// Validates the request, applies the selected matting strategy, erodes the
/// result, and premultiplies alpha for compositing. Pure and synchronous:
/// no ambient state, no partial results — validation failures are reported
/// before the buffer is touched.
///
/// # Errors
///
/// * [`ChromaKeyError::BufferSizeMismatch`] if `data.len() ≠ width × height × 4`.
/// * [`ChromaKeyError::InvalidColorFormat`] if the key color does not parse.
///
/// # Examples
///
/// ```
/// use chromakey::{run_pipeline, RawImageData, RemovalMode, RemovalRequest};
///
/// let request = RemovalRequest {
///     id: 7,
///     image: RawImageData { width: 2, height: 2, data: vec![0, 255, 0, 255].repeat(4) },
///     mode: RemovalMode::Flood,
///     target_color: "#00FF00".to_string(),
///     color_tolerance: 50.0,
///     smoothness: 0.0,
///     erode_strength: 0,
/// };
/// let response = run_pipeline(request).unwrap();
/// assert_eq!(response.id, 7);
/// assert!(response.image.data.chunks_exact(4).all(|px| px[3] == 0));
/// ```
pub fn run_pipeline(request: RemovalRequest) -> Result<RemovalResponse, ChromaKeyError> {
    let RawImageData { width, height, data } = request.image;
    validate_buffer_length(width, height, data.len())?;

    let green_mode = match request.mode {
        RemovalMode::Flood => GreenScreenMode::Hard,
        RemovalMode::Global => GreenScreenMode::Soft,
    };
    let key = KeyColor::from_hex(&request.target_color, green_mode).ok_or_else(|| {
        ChromaKeyError::InvalidColorFormat {
            input: request.target_color.clone(),
        }
    })?;

    debug!(
        id = request.id,
        width,
        height,
        mode = ?request.mode,
        key = ?key,
        "running chroma-key pipeline"
    );

    // Length was validated above, so reconstruction cannot fail; the error
    // arm keeps the function total without an unwrap.
    let mut image: Image<Rgba<u8>> =
        ImageBuffer::from_raw(width, height, data).ok_or(ChromaKeyError::BufferSizeMismatch {
            width,
            height,
            expected: (width as usize) * (height as usize) * 4,
            actual: 0,
        })?;

    match request.mode {
        RemovalMode::Flood => {
            let tolerance = percentage_to_fraction(request.color_tolerance);
            image.connected_matte_mut(&key, tolerance);
        }
        RemovalMode::Global => {
            let band = FeatherBand::from_percentages(request.color_tolerance, request.smoothness);
            image.global_matte_mut(&key, band);
        }
    }

    image
        .erode_alpha_mut(request.erode_strength)
        .premultiply_alpha_mut();

    Ok(RemovalResponse {
        id: request.id,
        image: RawImageData {
            width,
            height,
            data: image.into_raw(),
        },
    })
}
