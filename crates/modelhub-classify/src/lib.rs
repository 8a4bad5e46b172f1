pub mod category;
pub mod error;
pub mod size;

pub use category::categorize_model;
pub use error::classify_error_body;
pub use size::{image_size_for_ratio, parse_size, video_resolution_for_ratio};
