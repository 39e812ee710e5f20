pub mod color_model;
pub mod connected_matte;
pub mod erosion;
pub mod global_matte;
pub mod pipeline;
pub mod premultiply;
