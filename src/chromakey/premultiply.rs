use image::Rgba;
use imageproc::definitions::Image;

use crate::utils::normalize_alpha_with_max;

/// In-place alpha premultiplication for keyed output.
///
/// Compositing a straight-alpha matte over a new background bleeds the old
/// background color through feathered edges; premultiplying the color
/// channels by alpha avoids that. The alpha channel itself is kept.
pub trait PremultiplyAlphaExt {
    /// Scales each color channel by `alpha / 255`, keeping alpha.
    ///
    /// Fully opaque pixels are left bit-identical; fully transparent pixels
    /// end up with zeroed color channels.
    fn premultiply_alpha_mut(&mut self) -> &mut Self;
}

impl PremultiplyAlphaExt for Image<Rgba<u8>> {
    fn premultiply_alpha_mut(&mut self) -> &mut Self {
        for px in self.pixels_mut() {
            let Rgba([red, green, blue, alpha]) = *px;
            if alpha == 255 {
                continue;
            }
            let factor = normalize_alpha_with_max(alpha, 255.0);
            let scale = |channel: u8| (f32::from(channel) * factor).round() as u8;
            *px = Rgba([scale(red), scale(green), scale(blue), alpha]);
        }
        self
    }
}
