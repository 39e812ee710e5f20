//! Test utilities for chromakey
//!
//! This module provides common functionality for testing the matting stages.
//! It is only compiled when running tests.

use image::Rgba;
use imageproc::definitions::Image;

/// Creates an RGBA image filled with a single pixel value.
pub fn solid_rgba_image(width: u32, height: u32, pixel: Rgba<u8>) -> Image<Rgba<u8>> {
    Image::from_pixel(width, height, pixel)
}

/// Creates an image whose border ring is `ring` and whose interior is `center`.
///
/// With 4×4 dimensions this is the classic "enclosed background" fixture: a
/// 2×2 center patch that never touches the border.
pub fn ring_with_center_patch(
    width: u32,
    height: u32,
    ring: Rgba<u8>,
    center: Rgba<u8>,
) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
            ring
        } else {
            center
        }
    })
}

/// Extracts the alpha channel as a flat row-major plane.
pub fn alpha_plane(image: &Image<Rgba<u8>>) -> Vec<u8> {
    image.pixels().map(|px| px[3]).collect()
}
