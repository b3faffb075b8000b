//! Download run summary

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DownloadOutcome {
    /// Every window was written
    Completed,
    /// A window used up its attempts (or hit a non-retryable error); later
    /// windows were not requested
    Aborted {
        window_start: DateTime<Utc>,
        attempts: u32,
        last_error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadReport {
    pub product: String,
    pub windows_total: usize,
    pub windows_completed: usize,
    pub points_written: usize,
    /// End of the last window that was written
    pub completed_through: Option<DateTime<Utc>>,
    /// Courtesy delay reached by the end of the run
    pub courtesy_delay: Duration,
    pub outcome: DownloadOutcome,
}

impl DownloadReport {
    pub fn new(product: &str, windows_total: usize) -> Self {
        Self {
            product: product.to_string(),
            windows_total,
            windows_completed: 0,
            points_written: 0,
            completed_through: None,
            courtesy_delay: Duration::ZERO,
            outcome: DownloadOutcome::Completed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outcome == DownloadOutcome::Completed
    }
}
