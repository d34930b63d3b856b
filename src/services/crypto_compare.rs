//! CryptoCompare API source
//!
//! Fetches hourly or daily closes from https://min-api.cryptocompare.com.
//!
//! Features:
//! - `histohour` / `histoday` endpoints, quoted in USD
//! - Backwards pagination with `toTs` (max 2000 rows per request)
//! - Seconds converted to milliseconds
//! - Zero-volume rows skipped
//! - `Type 99` / rate-limit messages reported as [`SourceError::RateLimited`]

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::models::{PricePoint, PriceSeries, Resolution};
use crate::services::series_source::{SeriesSource, SourceError};

/// Base URL for CryptoCompare API
const BASE_URL: &str = "https://min-api.cryptocompare.com";

/// Maximum rows per history request
const MAX_LIMIT: usize = 2000;

/// CryptoCompare API response structure (for errors and success)
#[derive(Debug, Deserialize)]
struct CryptoCompareResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message")]
    #[serde(default)]
    message: String,
    #[serde(rename = "Type")]
    #[serde(default)]
    response_type: i32,
    #[serde(rename = "Data")]
    #[serde(default)]
    data: Option<serde_json::Value>, // Use Value to handle both CryptoCompareData and {}
}

#[derive(Debug, Deserialize)]
struct CryptoCompareData {
    #[serde(rename = "Data")]
    #[serde(default)]
    data: Vec<CryptoCompareCandle>,
}

#[derive(Debug, Deserialize)]
struct CryptoCompareCandle {
    time: i64,
    #[serde(default)]
    close: Option<f64>,
    #[serde(rename = "volumefrom")]
    #[serde(default)]
    volume_from: f64,
    #[serde(rename = "volumeto")]
    #[serde(default)]
    volume_to: f64,
}

/// CryptoCompare price source for one symbol
pub struct CryptoCompareSource {
    client: Client,
    symbol: String,
    api_key: Option<String>,
    base_url: String,
}

impl CryptoCompareSource {
    /// Create a new CryptoCompare source
    ///
    /// # Arguments
    ///
    /// * `symbol` - Cryptocurrency symbol (e.g., "BTC", "ETH")
    /// * `api_key` - Optional API key for authenticated requests (higher rate limits)
    /// * `timeout` - HTTP timeout per request
    pub fn new(
        symbol: impl Into<String>,
        api_key: Option<String>,
        timeout: StdDuration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            symbol: symbol.into(),
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get endpoint path for resolution
    fn endpoint_path(resolution: Resolution) -> &'static str {
        match resolution {
            Resolution::Daily => "/data/v2/histoday",
            Resolution::Hourly => "/data/v2/histohour",
        }
    }

    /// Make one HTTP request and check the API envelope
    async fn make_request(&self, url: &str) -> Result<CryptoCompareResponse, SourceError> {
        let mut request = self.client.get(url);

        // Add API key if provided
        if let Some(ref api_key) = self.api_key {
            request = request.header("Authorization", format!("Apikey {}", api_key));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("CryptoCompare returned HTTP {}", status);
            return Err(SourceError::from_status(status));
        }

        let body = response.text().await?;
        let data: CryptoCompareResponse = serde_json::from_str(&body)?;

        match data.response.as_str() {
            "Success" => Ok(data),
            "Error" => {
                // Type 99 is CryptoCompare's rate limit error
                if data.response_type == 99 || data.message.to_lowercase().contains("rate limit") {
                    warn!("CryptoCompare rate limit: {}", data.message);
                    return Err(SourceError::RateLimited);
                }
                Err(SourceError::Api(data.message))
            }
            other => Err(SourceError::Api(format!("Unknown API response: {}", other))),
        }
    }

    /// Fetch one page of history ending at `to_ts` (Unix seconds)
    ///
    /// # Returns
    ///
    /// Points in the order the API returned them (oldest first)
    async fn get_history(
        &self,
        resolution: Resolution,
        to_ts: Option<i64>,
        limit: usize,
    ) -> Result<Vec<PricePoint>, SourceError> {
        let limit = limit.min(MAX_LIMIT);

        // Build URL
        let mut url = format!(
            "{}{}?fsym={}&tsym=USD&limit={}",
            self.base_url,
            Self::endpoint_path(resolution),
            self.symbol,
            limit
        );

        // Add toTs for pagination
        if let Some(ts) = to_ts {
            url.push_str(&format!("&toTs={}", ts));
        }

        debug!("Fetching CryptoCompare data: {}", url);

        let response = self.make_request(&url).await?;

        let data_value = response.data.ok_or(SourceError::NoData)?;
        let data: CryptoCompareData = serde_json::from_value(data_value)?;

        Ok(parse_candles(data.data))
    }
}

/// Convert candles to points, skipping zero-volume rows and missing closes
fn parse_candles(candles: Vec<CryptoCompareCandle>) -> Vec<PricePoint> {
    candles
        .into_iter()
        .filter_map(|candle| {
            // Skip zero-volume candles
            if candle.volume_from == 0.0 && candle.volume_to == 0.0 {
                return None;
            }
            let close = candle.close?;
            Some(PricePoint::new(candle.time * 1000, close))
        })
        .collect()
}

#[async_trait]
impl SeriesSource for CryptoCompareSource {
    fn name(&self) -> &str {
        "cryptocompare"
    }

    async fn fetch_series(
        &self,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries, SourceError> {
        let needed = resolution.points_in_window(window_days).max(1);
        let mut all_points: Vec<PricePoint> = Vec::with_capacity(needed);
        let mut to_ts: Option<i64> = None;

        loop {
            let remaining = needed.saturating_sub(all_points.len());
            if remaining == 0 {
                break;
            }

            let limit = remaining.min(MAX_LIMIT);
            let batch = self.get_history(resolution, to_ts, limit).await?;

            if batch.is_empty() {
                break; // No more data
            }

            let batch_len = batch.len();

            // Next page ends just before the oldest row of this one
            if let Some(first) = batch.first() {
                to_ts = Some(first.timestamp_ms / 1000 - 1);
            }

            all_points.extend(batch);

            debug!(
                "Pagination: fetched {} rows, total: {}/{}",
                batch_len,
                all_points.len(),
                needed
            );

            // Stop if we got less than limit (no more data available)
            if batch_len < limit {
                break;
            }
        }

        let series = PriceSeries::normalized(all_points);

        info!(
            "Fetched {} {} points for {} from CryptoCompare",
            series.len(),
            resolution.as_str(),
            self.symbol
        );

        Ok(series)
    }
}
