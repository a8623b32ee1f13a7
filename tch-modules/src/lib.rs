//! Neural network building blocks on top of tch.

mod common;

pub mod alex_net;
pub mod conv_relu_2d;
pub mod fc_block;
pub mod max_pool_2d;

pub use alex_net::*;
pub use conv_relu_2d::*;
pub use fc_block::*;
pub use max_pool_2d::*;
