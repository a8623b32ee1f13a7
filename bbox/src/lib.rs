//! Safe bounding box types and functions.

mod common;

pub use hw::*;
pub mod hw;

pub use xyxy::*;
pub mod xyxy;

pub use scale::*;
mod scale;
