mod chromakey;
mod error;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Pixel};

pub use chromakey::color_model::{hex_to_rgb, GreenScreenMode, KeyColor, MAX_RGB_DISTANCE};
pub use chromakey::connected_matte::ConnectedMatteExt;
pub use chromakey::erosion::ErodeAlphaExt;
pub use chromakey::global_matte::{FeatherBand, GlobalMatteExt};
pub use chromakey::pipeline::{
    run_pipeline, RawImageData, RemovalMode, RemovalRequest, RemovalResponse,
};
pub use chromakey::premultiply::PremultiplyAlphaExt;
pub use error::ChromaKeyError;

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
