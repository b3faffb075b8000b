//! Data module
//!
//! Window slicing of the requested range and candle reshaping.

pub mod candle;
pub mod window;

pub use candle::*;
pub use window::*;
