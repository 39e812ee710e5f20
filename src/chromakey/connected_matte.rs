use image::{Rgb, Rgba};
use imageproc::definitions::Image;

use crate::chromakey::color_model::KeyColor;

/// One bit per pixel, addressed by linear index, sized once per flood fill.
struct VisitedMask {
    bits: Vec<u8>,
}

impl VisitedMask {
    fn new(pixel_count: usize) -> Self {
        Self {
            bits: vec![0; pixel_count.div_ceil(8)],
        }
    }

    /// Marks `index` visited; returns `false` if it already was.
    fn insert(&mut self, index: usize) -> bool {
        let byte = index / 8;
        let bit = 1 << (index % 8);
        let fresh = self.bits[byte] & bit == 0;
        self.bits[byte] |= bit;
        fresh
    }
}

/// Flood-fill matting with a hard edge.
///
/// Only background pixels 4-connected to the image border are cleared, so a
/// key-colored region fully enclosed by foreground keeps its alpha. The final
/// alpha plane depends only on reachability, never on traversal order.
pub trait ConnectedMatteExt {
    /// Clears the alpha of border-connected background pixels in place.
    ///
    /// The search is seeded at the four image corners and grows through
    /// pixels passing the hard background hit-test; a failing pixel is left
    /// untouched and never propagated through. `tolerance` is a fraction in
    /// [0, 1] (out-of-range values are clamped).
    fn connected_matte_mut(&mut self, key: &KeyColor, tolerance: f32) -> &mut Self;
}

impl ConnectedMatteExt for Image<Rgba<u8>> {
    fn connected_matte_mut(&mut self, key: &KeyColor, tolerance: f32) -> &mut Self {
        let (width, height) = (self.width() as usize, self.height() as usize);
        if width == 0 || height == 0 {
            return self;
        }

        let pixel_count = width * height;
        let mut visited = VisitedMask::new(pixel_count);
        let mut stack = vec![
            0,
            width - 1,
            (height - 1) * width,
            pixel_count - 1,
        ];

        let samples: &mut [u8] = &mut *self;
        while let Some(index) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }

            let base = index * 4;
            let pixel = Rgb([samples[base], samples[base + 1], samples[base + 2]]);
            if !key.is_background(pixel, tolerance) {
                continue;
            }
            samples[base + 3] = 0;

            let (x, y) = (index % width, index / width);
            if x > 0 {
                stack.push(index - 1);
            }
            if x + 1 < width {
                stack.push(index + 1);
            }
            if y > 0 {
                stack.push(index - width);
            }
            if y + 1 < height {
                stack.push(index + width);
            }
        }

        self
    }
}
