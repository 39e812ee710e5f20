use image::Rgba;
use imageproc::definitions::Image;
use itertools::iproduct;

/// Morphological erosion of the opaque region, applied to the alpha channel.
///
/// Keying leaves a fringe of semi-matched pixels around the subject; a few
/// erosion passes eat that fringe from the transparent side inward.
pub trait ErodeAlphaExt {
    /// Runs `strength` erosion iterations on the alpha channel in place.
    ///
    /// Each iteration snapshots the alpha plane first, so all decisions
    /// within one pass read pre-iteration state. An interior pixel with
    /// nonzero snapshot alpha is cleared when any 4-neighbor's snapshot alpha
    /// is zero. Border rows and columns are never modified, and
    /// `strength == 0` is the identity.
    fn erode_alpha_mut(&mut self, strength: u32) -> &mut Self;
}

impl ErodeAlphaExt for Image<Rgba<u8>> {
    fn erode_alpha_mut(&mut self, strength: u32) -> &mut Self {
        let (width, height) = (self.width() as usize, self.height() as usize);
        if strength == 0 || width < 3 || height < 3 {
            return self;
        }

        // One scratch plane reused across all iterations.
        let mut snapshot = vec![0u8; width * height];
        let samples: &mut [u8] = &mut *self;

        for _ in 0..strength {
            snapshot
                .iter_mut()
                .zip(samples.chunks_exact(4))
                .for_each(|(copy, px)| *copy = px[3]);

            let mut changed = false;
            for (y, x) in iproduct!(1..height - 1, 1..width - 1) {
                let i = y * width + x;
                if snapshot[i] == 0 {
                    continue;
                }
                let exposed = snapshot[i - 1] == 0
                    || snapshot[i + 1] == 0
                    || snapshot[i - width] == 0
                    || snapshot[i + width] == 0;
                if exposed {
                    samples[i * 4 + 3] = 0;
                    changed = true;
                }
            }

            // An unchanged pass is a fixpoint; further iterations are identity.
            if !changed {
                break;
            }
        }

        self
    }
}
