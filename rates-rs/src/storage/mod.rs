//! Storage module
//!
//! The point store seam and its InfluxDB implementation.

pub mod store;

pub use store::*;
