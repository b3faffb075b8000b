//! Error taxonomy for a download job

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DownloadError {
    /// The exchange could not be reached or answered with an error payload
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The exchange asked us to slow down
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("write failed: {0}")]
    Write(String),

    /// Listing or creating the target database failed
    #[error("database request failed: {0}")]
    Database(String),

    /// A candle row that is not a 6-element numeric tuple
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("database {name} still missing after {polls} polls")]
    DatabaseUnavailable { name: String, polls: u32 },

    #[error("invalid job: {0}")]
    InvalidJob(String),
}

impl DownloadError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, DownloadError::RateLimited(_))
    }

    /// Errors that consume one attempt of the per-window retry budget
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DownloadError::Fetch(_)
                | DownloadError::RateLimited(_)
                | DownloadError::Write(_)
                | DownloadError::MalformedRecord(_)
        )
    }

    pub(crate) fn fetch(error: anyhow::Error) -> Self {
        DownloadError::Fetch(format!("{:#}", error))
    }

    pub(crate) fn write(error: anyhow::Error) -> Self {
        DownloadError::Write(format!("{:#}", error))
    }

    pub(crate) fn database(error: anyhow::Error) -> Self {
        DownloadError::Database(format!("{:#}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(DownloadError::Fetch("timeout".into()).is_retryable());
        assert!(DownloadError::RateLimited("slow".into()).is_retryable());
        assert!(DownloadError::Write("down".into()).is_retryable());
        assert!(DownloadError::MalformedRecord("short".into()).is_retryable());
        assert!(!DownloadError::InvalidJob("empty".into()).is_retryable());
        assert!(!DownloadError::Database("refused".into()).is_retryable());
        assert!(!DownloadError::DatabaseUnavailable {
            name: "db".into(),
            polls: 3
        }
        .is_retryable());
    }

    #[test]
    fn test_rate_limit_only_for_rate_limited() {
        assert!(DownloadError::RateLimited("slow".into()).is_rate_limit());
        assert!(!DownloadError::Fetch("rate limit exceeded".into()).is_rate_limit());
    }

    #[test]
    fn test_wraps_anyhow_chain() {
        let error = anyhow::anyhow!("connection refused").context("Failed to request candles");
        assert_eq!(
            DownloadError::fetch(error).to_string(),
            "fetch failed: Failed to request candles: connection refused"
        );

        let error = anyhow::anyhow!("connection refused").context("Failed to list databases");
        assert_eq!(
            DownloadError::database(error).to_string(),
            "database request failed: Failed to list databases: connection refused"
        );
    }
}
