use anyhow::{anyhow, Context, Result};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{StoragePoint, TimePrecision};

/// Thin client over the InfluxDB 1.x HTTP API
#[derive(Debug, Clone)]
pub struct InfluxClient {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Series>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl InfluxClient {
    pub fn new(
        base_url: String,
        username: Option<String>,
        password: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        info!("Using InfluxDB at: {}", base_url);
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            client,
        })
    }

    /// Basic auth header; credentials must stay out of the request URL.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        }
    }

    /// Names of every database on the server
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        let response = self
            .authorize(self.client.get(format!("{}/query", self.base_url)))
            .query(&[("q", "SHOW DATABASES")])
            .send()
            .await
            .context("Failed to list databases")?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("SHOW DATABASES failed ({}): {}", status, body));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)
            .with_context(|| format!("Malformed SHOW DATABASES response: {}", body))?;
        if let Some(error) = parsed.error {
            return Err(anyhow!("SHOW DATABASES failed: {}", error));
        }

        let mut names = Vec::new();
        for result in parsed.results {
            if let Some(error) = result.error {
                return Err(anyhow!("SHOW DATABASES failed: {}", error));
            }
            for series in result.series {
                names.extend(
                    series
                        .values
                        .iter()
                        .filter_map(|row| row.first())
                        .filter_map(|v| v.as_str())
                        .map(str::to_string),
                );
            }
        }
        debug!(?names, "listed databases");
        Ok(names)
    }

    pub async fn create_database(&self, name: &str) -> Result<()> {
        let statement = format!("CREATE DATABASE \"{}\"", name.replace('"', "\\\""));
        let response = self
            .authorize(self.client.post(format!("{}/query", self.base_url)))
            .query(&[("q", statement.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to create database {}", name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("CREATE DATABASE {} failed ({}): {}", name, status, body));
        }
        info!("Created database {}", name);
        Ok(())
    }

    /// Write a batch of points in a single request
    pub async fn write_points(
        &self,
        database: &str,
        points: &[StoragePoint],
        precision: TimePrecision,
    ) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let body = points
            .iter()
            .map(StoragePoint::to_line_protocol)
            .collect::<Vec<_>>()
            .join("\n");

        let response = self
            .authorize(self.client.post(format!("{}/write", self.base_url)))
            .query(&[("db", database), ("precision", precision.as_str())])
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to write points to {}", database))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Write to {} failed ({}): {}", database, status, body));
        }
        debug!(count = points.len(), database, "wrote points");
        Ok(())
    }
}
