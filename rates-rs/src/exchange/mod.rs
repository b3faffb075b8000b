//! Exchange integration module
//!
//! The candle source seam and its Coinbase implementation.

pub mod source;

pub use source::*;
