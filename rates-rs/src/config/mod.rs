//! Configuration module

pub mod download;

pub use download::*;
