//! Point store backed by the InfluxDB client

use crate::error::DownloadError;
use crate::Result;
use shared::{InfluxClient, StoragePoint, TimePrecision};
use std::future::Future;

/// Time-series database operations the downloader needs
pub trait PointStore {
    fn list_databases(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn create_database(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Write `points` in one batch
    fn write_points(
        &self,
        database: &str,
        points: &[StoragePoint],
        precision: TimePrecision,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl PointStore for InfluxClient {
    async fn list_databases(&self) -> Result<Vec<String>> {
        InfluxClient::list_databases(self)
            .await
            .map_err(DownloadError::database)
    }

    async fn create_database(&self, name: &str) -> Result<()> {
        InfluxClient::create_database(self, name)
            .await
            .map_err(DownloadError::database)
    }

    async fn write_points(
        &self,
        database: &str,
        points: &[StoragePoint],
        precision: TimePrecision,
    ) -> Result<()> {
        InfluxClient::write_points(self, database, points, precision)
            .await
            .map_err(DownloadError::write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// Address of a local port with nothing listening on it
    fn closed_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn client(url: String) -> InfluxClient {
        InfluxClient::new(
            url,
            Some("admin".to_string()),
            Some("s3cretpw".to_string()),
            2,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_database_errors() {
        let client = client(closed_address());

        let error = PointStore::list_databases(&client).await.unwrap_err();
        assert!(matches!(error, DownloadError::Database(_)), "{:?}", error);
        assert!(!error.to_string().contains("s3cretpw"), "{}", error);

        let error = PointStore::create_database(&client, "rates").await.unwrap_err();
        assert!(matches!(error, DownloadError::Database(_)), "{:?}", error);
        assert!(!error.to_string().contains("s3cretpw"), "{}", error);
    }

    #[tokio::test]
    async fn test_unreachable_write_keeps_password_out() {
        let client = client(closed_address());
        let point = StoragePoint {
            measurement: "BTC-USD".to_string(),
            time: 1609459200,
            fields: shared::CandleFields {
                low: 1.0,
                high: 2.0,
                open: 1.5,
                close: 1.75,
                volume: 10.0,
            },
        };

        let error = PointStore::write_points(&client, "rates", &[point], TimePrecision::Seconds)
            .await
            .unwrap_err();
        assert!(matches!(error, DownloadError::Write(_)), "{:?}", error);
        assert!(!error.to_string().contains("s3cretpw"), "{}", error);
    }
}
