use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::debug;

use crate::models::{CandlesResponse, ExchangeErrorBody, RawCandle};

const USER_AGENT: &str = concat!("coinbase-historic-rates/", env!("CARGO_PKG_VERSION"));

/// Public (unauthenticated) Coinbase Exchange REST client
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoinbaseClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/products/{product}/candles`, with `product` encoded as a
    /// single path segment
    fn candles_url(&self, product: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid exchange URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Exchange URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["products", product, "candles"]);
        Ok(url)
    }

    /// Fetch the candles of `product` between `start` and `end`.
    ///
    /// Returns `Err` only when the exchange could not be reached or answered
    /// with something unparseable. Error payloads come back as
    /// [`CandlesResponse::RateLimited`] or [`CandlesResponse::Rejected`].
    pub async fn get_product_historic_rates(
        &self,
        product: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: u32,
    ) -> Result<CandlesResponse> {
        let url = self.candles_url(product)?;
        let start = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let granularity = granularity.to_string();
        debug!(%url, %start, %end, %granularity, "requesting candles");

        let response = self
            .client
            .get(url)
            .query(&[
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("granularity", granularity.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to request candles for {}", product))?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            if let Ok(candles) = serde_json::from_str::<Vec<RawCandle>>(&body) {
                return Ok(CandlesResponse::Candles(candles));
            }
            // an error object can still come back with a 2xx status
            let error: ExchangeErrorBody = serde_json::from_str(&body)
                .with_context(|| format!("Malformed candles response: {}", body))?;
            return Ok(classify_error(status, error.message));
        }

        let message = serde_json::from_str::<ExchangeErrorBody>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Ok(classify_error(status, message))
    }
}

fn classify_error(status: StatusCode, message: String) -> CandlesResponse {
    if status == StatusCode::TOO_MANY_REQUESTS
        || message.to_lowercase().contains("rate limit exceeded")
    {
        CandlesResponse::RateLimited { message }
    } else {
        CandlesResponse::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candles_url_encodes_product() {
        let client =
            CoinbaseClient::new("https://api.exchange.coinbase.com/".to_string(), 5).unwrap();
        assert_eq!(
            client.candles_url("BTC-USD").unwrap().as_str(),
            "https://api.exchange.coinbase.com/products/BTC-USD/candles"
        );
        assert_eq!(
            client.candles_url("BTC/USD?x=1").unwrap().as_str(),
            "https://api.exchange.coinbase.com/products/BTC%2FUSD%3Fx=1/candles"
        );

        let client = CoinbaseClient::new("http://localhost:8080/api".to_string(), 5).unwrap();
        assert_eq!(
            client.candles_url("ETH-EUR").unwrap().path(),
            "/api/products/ETH-EUR/candles"
        );
    }

    #[test]
    fn test_classify_too_many_requests() {
        let response = classify_error(StatusCode::TOO_MANY_REQUESTS, "slow down".to_string());
        assert_eq!(
            response,
            CandlesResponse::RateLimited {
                message: "slow down".to_string()
            }
        );
    }

    #[test]
    fn test_classify_rate_limit_message() {
        let response = classify_error(StatusCode::OK, "Public rate limit exceeded".to_string());
        assert!(matches!(response, CandlesResponse::RateLimited { .. }));
    }

    #[test]
    fn test_classify_other_error() {
        let response = classify_error(StatusCode::NOT_FOUND, "NotFound".to_string());
        assert_eq!(
            response,
            CandlesResponse::Rejected {
                status: 404,
                message: "NotFound".to_string()
            }
        );
    }
}
