//! Retrieval-and-write loop

use crate::config::DownloadConfig;
use crate::data::{map_records, Window, WindowRange};
use crate::downloader::{DownloadJob, DownloadOutcome, DownloadReport};
use crate::error::DownloadError;
use crate::exchange::CandleSource;
use crate::storage::PointStore;
use crate::Result;
use shared::{CandlesResponse, TimePrecision};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Result of a single fetch-transform-write attempt
#[derive(Debug)]
enum AttemptOutcome {
    Written(usize),
    Retryable(DownloadError),
    Fatal(DownloadError),
}

/// Why a window was given up on
#[derive(Debug)]
struct WindowFailure {
    attempts: u32,
    error: DownloadError,
}

/// Drives the windows of a job through an exchange source into a point
/// store, one window and one attempt at a time.
pub struct Downloader<S, P> {
    source: S,
    store: P,
    config: DownloadConfig,
}

impl<S, P> Downloader<S, P>
where
    S: CandleSource,
    P: PointStore,
{
    pub fn new(source: S, store: P) -> Self {
        Self::with_config(source, store, DownloadConfig::default())
    }

    pub fn with_config(source: S, store: P, config: DownloadConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Poll the database list until the target database shows up, creating
    /// it whenever it is missing.
    pub async fn ensure_database(&self) -> Result<()> {
        let name = self.config.database.as_str();
        let polls = self.config.readiness_polls;

        for poll in 1..=polls {
            match self.store.list_databases().await {
                Ok(names) if names.iter().any(|n| n == name) => {
                    debug!(database = name, poll, "database ready");
                    return Ok(());
                }
                Ok(_) => {
                    info!("Database {} not found, creating it", name);
                    if let Err(e) = self.store.create_database(name).await {
                        warn!(database = name, error = %e, "Failed to create database");
                    }
                }
                Err(e) => {
                    warn!(database = name, poll, error = %e, "Failed to list databases");
                }
            }

            if poll < polls {
                sleep(self.config.readiness_interval).await;
            }
        }

        Err(DownloadError::DatabaseUnavailable {
            name: name.to_string(),
            polls,
        })
    }

    /// Download `job` window by window.
    ///
    /// A window that exhausts its attempts stops the run; that is reported
    /// through the returned [`DownloadReport`], not as an `Err`. Only an
    /// invalid job or an unavailable database is an `Err`.
    pub async fn download_historic_rates(&self, job: &DownloadJob) -> Result<DownloadReport> {
        job.validate()?;
        let range =
            WindowRange::with_step_minutes(job.start_time, job.end_time, self.config.step_minutes)?;

        self.ensure_database().await?;

        let mut report = DownloadReport::new(&job.product, range.len());
        // only ever grows during a run
        let mut courtesy_delay = Duration::ZERO;

        info!(
            product = %job.product,
            start = %job.start_time,
            end = %job.end_time,
            granularity = job.granularity,
            windows = report.windows_total,
            "Starting historic rates download"
        );

        for window in range.windows() {
            info!("Processing time slice: {} - {}", window.start, window.end);

            match self.download_window(job, window, &mut courtesy_delay).await {
                Ok(points) => {
                    report.windows_completed += 1;
                    report.points_written += points;
                    report.completed_through = Some(window.end);
                    report.courtesy_delay = courtesy_delay;

                    if !courtesy_delay.is_zero() {
                        debug!(delay = ?courtesy_delay, "courtesy sleep");
                        sleep(courtesy_delay).await;
                    }
                }
                Err(failure) => {
                    error!(
                        product = %job.product,
                        window_start = %window.start,
                        attempts = failure.attempts,
                        error = %failure.error,
                        "Giving up on time slice, aborting download"
                    );
                    report.courtesy_delay = courtesy_delay;
                    report.outcome = DownloadOutcome::Aborted {
                        window_start: window.start,
                        attempts: failure.attempts,
                        last_error: failure.error.to_string(),
                    };
                    return Ok(report);
                }
            }
        }

        info!(
            product = %job.product,
            windows = report.windows_completed,
            points = report.points_written,
            "Historic rates download complete"
        );
        Ok(report)
    }

    async fn download_window(
        &self,
        job: &DownloadJob,
        window: Window,
        courtesy_delay: &mut Duration,
    ) -> std::result::Result<usize, WindowFailure> {
        let max_attempts = self.config.max_attempts;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(job, window, courtesy_delay).await {
                AttemptOutcome::Written(points) => {
                    debug!(attempt, points, "time slice written");
                    return Ok(points);
                }
                AttemptOutcome::Retryable(error) => {
                    warn!(
                        attempt,
                        max_attempts,
                        error = %error,
                        "Time slice attempt failed"
                    );
                    last_error = Some(error);
                }
                AttemptOutcome::Fatal(error) => {
                    return Err(WindowFailure {
                        attempts: attempt,
                        error,
                    });
                }
            }
        }

        Err(WindowFailure {
            attempts: max_attempts,
            error: last_error
                .unwrap_or_else(|| DownloadError::Fetch("no attempts allowed".to_string())),
        })
    }

    async fn attempt(
        &self,
        job: &DownloadJob,
        window: Window,
        courtesy_delay: &mut Duration,
    ) -> AttemptOutcome {
        match self.fetch_and_write(job, window).await {
            Ok(points) => AttemptOutcome::Written(points),
            Err(error) if error.is_rate_limit() => {
                *courtesy_delay += self.config.courtesy_increment;
                warn!(
                    courtesy_delay = ?*courtesy_delay,
                    "Rate limit exceeded, backing off"
                );
                sleep(self.config.rate_limit_pause).await;
                AttemptOutcome::Retryable(error)
            }
            Err(error) if error.is_retryable() => AttemptOutcome::Retryable(error),
            Err(error) => AttemptOutcome::Fatal(error),
        }
    }

    async fn fetch_and_write(&self, job: &DownloadJob, window: Window) -> Result<usize> {
        let response = self
            .source
            .fetch_candles(&job.product, window.start, window.end, job.granularity)
            .await?;

        let rows = match response {
            CandlesResponse::Candles(rows) => rows,
            CandlesResponse::RateLimited { message } => {
                return Err(DownloadError::RateLimited(message));
            }
            CandlesResponse::Rejected { status, message } => {
                return Err(DownloadError::Fetch(format!(
                    "exchange rejected request ({}): {}",
                    status, message
                )));
            }
        };

        let points = map_records(&job.product, &rows)?;
        self.store
            .write_points(&self.config.database, &points, TimePrecision::Seconds)
            .await?;

        Ok(points.len())
    }
}
