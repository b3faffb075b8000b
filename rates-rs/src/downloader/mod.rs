//! Downloader module
//!
//! Job parameters, the retrieval-and-write loop and its run summary.

pub mod engine;
pub mod job;
pub mod report;

pub use engine::*;
pub use job::*;
pub use report::*;
