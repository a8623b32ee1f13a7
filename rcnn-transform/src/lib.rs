//! Input and output transforms of two-stage object detectors.
//!
//! Images are normalized and resized into a configured edge length range,
//! packed into a zero-padded batch, and predicted boxes are mapped back to
//! the original image sizes after inference.

mod common;

pub mod batch;
pub mod boxes;
pub mod config;
pub mod image_list;
pub mod target;
pub mod tensor;
pub mod transform;

pub use batch::*;
pub use boxes::*;
pub use config::*;
pub use image_list::*;
pub use target::*;
pub use tensor::*;
pub use transform::*;
