use anyhow::Result;
use clap::Parser;
use rates_rs::downloader::{DownloadOutcome, Downloader};
use shared::{CoinbaseClient, Config, InfluxClient};
use tracing::{error, info};

mod cli;
mod logging;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_file, args.verbose)?;

    info!("Starting historic rates downloader...");

    let config = Config::from_env()?;
    let source = CoinbaseClient::new(config.coinbase_api_url.clone(), config.http_timeout_secs)?;
    let store = InfluxClient::new(
        config.influxdb_url(),
        config.influxdb_user.clone(),
        config.influxdb_password.clone(),
        config.http_timeout_secs,
    )?;
    info!("Clients initialized");

    let downloader = Downloader::new(source, store);
    let job = args.into_job();
    let report = downloader.download_historic_rates(&job).await?;

    match &report.outcome {
        DownloadOutcome::Completed => {
            info!(
                "Downloaded {} candles of {} in {} time slices",
                report.points_written, report.product, report.windows_completed
            );
        }
        DownloadOutcome::Aborted { window_start, .. } => {
            error!(
                "Download of {} stopped at time slice {} ({} of {} slices written)",
                report.product, window_start, report.windows_completed, report.windows_total
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
