use image::{Luma, Rgb, Rgba};
use imageproc::definitions::Image;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::chromakey::color_model::KeyColor;

/// Similarity band over which alpha ramps from opaque to transparent.
///
/// `edge_start` is the tolerance as a fraction: at or above it a pixel is
/// fully background. `edge_end` is `edge_start` minus the smoothness fraction
/// (floored at zero): at or below it a pixel is fully foreground. Similarities
/// in between feather linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatherBand {
    edge_start: f32,
    edge_end: f32,
}

impl FeatherBand {
    /// Builds the band from UI-style percentages, clamping both to [0, 100].
    pub fn from_percentages(tolerance: f32, smoothness: f32) -> Self {
        let edge_start = crate::utils::percentage_to_fraction(tolerance);
        let smoothness = crate::utils::percentage_to_fraction(smoothness);
        Self {
            edge_start,
            edge_end: (edge_start - smoothness).max(0.0),
        }
    }

    /// The tolerance fraction, also used to relax the green-screen gates.
    pub const fn tolerance(&self) -> f32 {
        self.edge_start
    }

    /// Maps a similarity score in [0, 1] to an alpha value.
    ///
    /// Three zones: background (0), feather (linear ramp), foreground (255).
    /// Monotonically non-increasing in `similarity`.
    pub fn alpha_for(&self, similarity: f32) -> u8 {
        if similarity >= self.edge_start {
            0
        } else if similarity <= self.edge_end {
            255
        } else {
            // edge_end < similarity < edge_start implies a nonzero range.
            let range = self.edge_start - self.edge_end;
            let alpha = 255.0 * (1.0 - (similarity - self.edge_end) / range);
            alpha.round().clamp(0.0, 255.0) as u8
        }
    }
}

/// Feathered whole-image matting.
///
/// Every pixel is classified independently of its neighbors, so this pass is
/// a pure per-pixel map; with the `rayon` feature it runs in parallel.
pub trait GlobalMatteExt {
    /// Rewrites the alpha channel in place from per-pixel key similarity.
    ///
    /// Color channels are left untouched; only alpha changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use chromakey::{FeatherBand, GlobalMatteExt, Image, KeyColor};
    /// use image::{Rgb, Rgba};
    ///
    /// let mut image: Image<Rgba<u8>> = Image::from_pixel(2, 2, Rgba([0, 200, 30, 255]));
    /// let key = KeyColor::RgbDistance(Rgb([0, 200, 30]));
    /// image.global_matte_mut(&key, FeatherBand::from_percentages(40.0, 10.0));
    /// assert_eq!(image.get_pixel(0, 0)[3], 0);
    /// ```
    fn global_matte_mut(&mut self, key: &KeyColor, band: FeatherBand) -> &mut Self;

    /// Computes the feathered alpha plane without touching the source image.
    ///
    /// Useful when compositing happens elsewhere and only the matte is needed.
    fn global_matte_plane(&self, key: &KeyColor, band: FeatherBand) -> Image<Luma<u8>>;
}

impl GlobalMatteExt for Image<Rgba<u8>> {
    fn global_matte_mut(&mut self, key: &KeyColor, band: FeatherBand) -> &mut Self {
        let tolerance = band.tolerance();
        let matte = move |px: &mut [u8]| {
            let similarity = key.similarity(Rgb([px[0], px[1], px[2]]), tolerance);
            px[3] = band.alpha_for(similarity);
        };

        #[cfg(feature = "rayon")]
        self.par_chunks_exact_mut(4).for_each(matte);
        #[cfg(not(feature = "rayon"))]
        self.chunks_exact_mut(4).for_each(matte);

        self
    }

    fn global_matte_plane(&self, key: &KeyColor, band: FeatherBand) -> Image<Luma<u8>> {
        let tolerance = band.tolerance();
        imageproc::map::map_colors(self, |Rgba([r, g, b, _])| {
            Luma([band.alpha_for(key.similarity(Rgb([r, g, b]), tolerance))])
        })
    }
}
