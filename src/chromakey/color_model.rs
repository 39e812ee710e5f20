use image::Rgb;

/// Maximum Euclidean distance between two RGB colors, `sqrt(3 × 255²)` rounded up.
///
/// Similarity scores and hard hit-test radii are normalized against this value
/// so that tolerance can be expressed as a fraction of the full color range.
pub const MAX_RGB_DISTANCE: f32 = 442.0;

/// Parses a 6-hex-digit color with an optional leading `#`, case-insensitive.
///
/// Returns `None` for any other shape (wrong length, shorthand `#RGB`,
/// non-hex characters). Callers that want the legacy "silent black" behavior
/// of older chroma-key tools can write `hex_to_rgb(s).unwrap_or(Rgb([0, 0, 0]))`;
/// the pipeline itself surfaces a parse failure as an error instead.
///
/// # Examples
///
/// ```
/// use chromakey::hex_to_rgb;
/// use image::Rgb;
///
/// assert_eq!(hex_to_rgb("#00FF00"), Some(Rgb([0, 255, 0])));
/// assert_eq!(hex_to_rgb("1a2B3c"), Some(Rgb([26, 43, 60])));
/// assert_eq!(hex_to_rgb("#fff"), None);
/// ```
pub fn hex_to_rgb(hex: &str) -> Option<Rgb<u8>> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range| u8::from_str_radix(&digits[range], 16).ok();
    Some(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Threshold profile for the green-screen classifier.
///
/// The saturation/value floors start from different base constants depending
/// on whether the classifier feeds a hard hit-test (flood fill) or a
/// continuous similarity score (feathering). Keeping the two profiles distinct
/// is deliberate: the hard profile is stricter so the flood fill does not eat
/// into dim or washed-out foreground, while the soft profile admits more of
/// the screen so the feather has a band to work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreenScreenMode {
    /// Feathered classification: saturation base 0.25, value base 0.35.
    Soft,
    /// Flood-fill hit-testing: saturation base 0.5, value base 0.5.
    Hard,
}

impl GreenScreenMode {
    const fn threshold_bases(self) -> (f32, f32) {
        match self {
            Self::Soft => (0.25, 0.35),
            Self::Hard => (0.5, 0.5),
        }
    }
}

/// The color-similarity model for one removal request.
///
/// Selected once per request and consumed identically by both matting
/// strategies, so the per-mode constants live here rather than being
/// re-derived at each call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyColor {
    /// Arbitrary target color, scored by Euclidean RGB distance.
    RgbDistance(Rgb<u8>),
    /// The green-screen reference (0,255,0), scored by an HSV heuristic.
    GreenScreenHsv(GreenScreenMode),
}

impl KeyColor {
    /// Builds the model for a request from its hex color string.
    ///
    /// A key of exactly (0,255,0) selects the specialized green-screen
    /// classifier; any other color uses plain RGB distance. `mode` only
    /// matters for the green-screen variant.
    pub fn from_hex(hex: &str, mode: GreenScreenMode) -> Option<Self> {
        let target = hex_to_rgb(hex)?;
        Some(if target == Rgb([0, 255, 0]) {
            Self::GreenScreenHsv(mode)
        } else {
            Self::RgbDistance(target)
        })
    }

    /// Continuous background similarity in [0, 1]; 1.0 means "certainly background".
    ///
    /// The RGB variant is `1 − dist/442` and ignores `tolerance`. The
    /// green-screen variant gates the pixel first (hue sector, saturation and
    /// value floors relaxed by `tolerance`) and then reports the raw HSV
    /// saturation as the score, so feathering still has a gradient to ramp
    /// over; pixels that fail the gate score 0.0.
    pub fn similarity(&self, pixel: Rgb<u8>, tolerance: f32) -> f32 {
        match *self {
            Self::RgbDistance(target) => {
                (1.0 - rgb_distance(pixel, target) / MAX_RGB_DISTANCE).clamp(0.0, 1.0)
            }
            Self::GreenScreenHsv(mode) => {
                if is_dominant_green(pixel) {
                    return 1.0;
                }
                let (hue, saturation, value) = rgb_to_hsv(pixel);
                if passes_green_gates(hue, saturation, value, tolerance, mode) {
                    saturation.clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }

    /// Hard background hit-test used by the flood fill.
    ///
    /// `tolerance` is a fraction in [0, 1]: for the RGB variant it scales the
    /// acceptance radius up to the full color range, for the green-screen
    /// variant it relaxes the saturation/value floors.
    pub fn is_background(&self, pixel: Rgb<u8>, tolerance: f32) -> bool {
        let tolerance = tolerance.clamp(0.0, 1.0);
        match *self {
            Self::RgbDistance(target) => {
                rgb_distance(pixel, target) <= tolerance * MAX_RGB_DISTANCE
            }
            Self::GreenScreenHsv(mode) => {
                if is_dominant_green(pixel) {
                    return true;
                }
                let (hue, saturation, value) = rgb_to_hsv(pixel);
                passes_green_gates(hue, saturation, value, tolerance, mode)
            }
        }
    }
}

fn rgb_distance(a: Rgb<u8>, b: Rgb<u8>) -> f32 {
    let diff = |x: u8, y: u8| {
        let d = f32::from(x) - f32::from(y);
        d * d
    };
    (diff(a[0], b[0]) + diff(a[1], b[1]) + diff(a[2], b[2])).sqrt()
}

/// Near-pure green screens are recognized without any HSV computation.
///
/// Checked before the hue gate; it cannot admit anything the gate would
/// reject, since a strictly green-dominant pixel always lands in (60°, 180°).
fn is_dominant_green(Rgb([r, g, b]): Rgb<u8>) -> bool {
    let (r, g, b) = (u16::from(r), u16::from(g), u16::from(b));
    g > r + 30 && g > b + 30 && g > 80
}

fn passes_green_gates(
    hue: f32,
    saturation: f32,
    value: f32,
    tolerance: f32,
    mode: GreenScreenMode,
) -> bool {
    // Outside the green sector the pixel can never be background.
    if !(60.0..=180.0).contains(&hue) {
        return false;
    }
    let (base_sat, base_val) = mode.threshold_bases();
    let relax = 1.0 - tolerance * 0.5;
    saturation >= base_sat * relax && value >= base_val * relax
}

/// RGB → HSV with hue in degrees [0, 360), saturation and value in [0, 1].
fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> (f32, f32, f32) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_six_digits_with_optional_hash() {
        assert_eq!(hex_to_rgb("#FF0000"), Some(Rgb([255, 0, 0])));
        assert_eq!(hex_to_rgb("ff0000"), Some(Rgb([255, 0, 0])));
        assert_eq!(hex_to_rgb("#AbCdEf"), Some(Rgb([0xAB, 0xCD, 0xEF])));
    }

    #[test]
    fn hex_parsing_rejects_malformed_input() {
        for input in ["", "#", "#fff", "fff", "#ff00000", "ff00", "#gg0000", "red", "##ff0000"] {
            assert_eq!(hex_to_rgb(input), None, "should reject {input:?}");
        }
    }

    #[test]
    fn green_screen_key_selected_for_pure_green_only() {
        assert_eq!(
            KeyColor::from_hex("#00ff00", GreenScreenMode::Soft),
            Some(KeyColor::GreenScreenHsv(GreenScreenMode::Soft))
        );
        assert_eq!(
            KeyColor::from_hex("#00FF00", GreenScreenMode::Hard),
            Some(KeyColor::GreenScreenHsv(GreenScreenMode::Hard))
        );
        assert_eq!(
            KeyColor::from_hex("#00fe00", GreenScreenMode::Soft),
            Some(KeyColor::RgbDistance(Rgb([0, 254, 0])))
        );
    }

    #[test]
    fn rgb_similarity_is_one_for_identical_colors() {
        let key = KeyColor::RgbDistance(Rgb([12, 200, 99]));
        assert_eq!(key.similarity(Rgb([12, 200, 99]), 0.5), 1.0);
    }

    #[test]
    fn rgb_similarity_for_opposite_corners_is_near_zero() {
        let key = KeyColor::RgbDistance(Rgb([0, 0, 0]));
        let similarity = key.similarity(Rgb([255, 255, 255]), 0.5);
        // sqrt(3·255²)/442 ≈ 0.99926
        assert!(similarity < 0.01, "got {similarity}");
    }

    #[test]
    fn rgb_hard_hit_test_scales_with_tolerance() {
        let key = KeyColor::RgbDistance(Rgb([100, 100, 100]));
        // distance to (150,100,100) is 50; 50/442 ≈ 0.113
        assert!(key.is_background(Rgb([150, 100, 100]), 0.12));
        assert!(!key.is_background(Rgb([150, 100, 100]), 0.11));
    }

    #[test]
    fn dominant_green_overrides_hsv_thresholds() {
        // Dim green: value 120/255 ≈ 0.47 fails the hard value floor of 0.5
        // at zero tolerance, but the dominant-green fast path still fires.
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Hard);
        assert!(key.is_background(Rgb([10, 120, 10]), 0.0));
    }

    #[test]
    fn dominant_green_requires_margin_over_both_channels() {
        assert!(is_dominant_green(Rgb([0, 255, 0])));
        assert!(!is_dominant_green(Rgb([230, 255, 0])), "red too close");
        assert!(!is_dominant_green(Rgb([0, 255, 230])), "blue too close");
        assert!(!is_dominant_green(Rgb([10, 60, 10])), "too dark");
    }

    #[test]
    fn hue_gate_excludes_non_green_sectors() {
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Hard);
        // Saturated bright red and blue: high sat/val but wrong hue.
        assert!(!key.is_background(Rgb([255, 0, 0]), 1.0));
        assert!(!key.is_background(Rgb([40, 0, 255]), 1.0));
    }

    #[test]
    fn cyan_sits_inside_the_green_sector() {
        // Hue of pure cyan is 180°, the inclusive upper edge of the gate.
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Hard);
        assert!(key.is_background(Rgb([0, 255, 255]), 0.0));
    }

    #[test]
    fn tolerance_relaxes_saturation_and_value_floors() {
        // Dim green: saturation 30/110 ≈ 0.27 and value ≈ 0.43, both below
        // the hard bases of 0.5 but above the fully relaxed floors of 0.25,
        // and not green-dominant enough for the fast path.
        let pixel = Rgb([80, 110, 80]);
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Hard);
        assert!(!key.is_background(pixel, 0.0));
        assert!(key.is_background(pixel, 1.0));
    }

    #[test]
    fn soft_similarity_reports_saturation_for_gated_pixels() {
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Soft);
        // Not dominant-green (margin over both channels is only 28), but
        // passes the soft gates: hue 120°, saturation 0.2, value ≈ 0.55.
        let pixel = Rgb([112, 140, 112]);
        let similarity = key.similarity(pixel, 0.5);
        assert!((similarity - 0.2).abs() < 1e-4, "got {similarity}");
    }

    #[test]
    fn soft_similarity_is_one_on_the_fast_path() {
        let key = KeyColor::GreenScreenHsv(GreenScreenMode::Soft);
        assert_eq!(key.similarity(Rgb([0, 255, 0]), 0.0), 1.0);
    }

    #[test]
    fn rgb_to_hsv_known_values() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), (0.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), (120.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), (240.0, 1.0, 1.0));
        let (h, s, v) = rgb_to_hsv(Rgb([128, 128, 128]));
        assert_eq!((h, s), (0.0, 0.0));
        assert!((v - 128.0 / 255.0).abs() < 1e-6);
    }
}
