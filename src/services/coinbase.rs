//! Coinbase Exchange candles source
//!
//! `GET /products/{product}/candles?granularity=G&start=S&end=E`
//!
//! Rows are `[time, low, high, open, close, volume]` with `time` in Unix
//! seconds, returned **newest first**. At most 300 candles per request, so
//! the window is walked in 300-candle pages and the result is sorted
//! ascending before it is returned.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::models::{PricePoint, PriceSeries, Resolution};
use crate::services::series_source::{SeriesSource, SourceError};

/// Base URL for Coinbase Exchange public API
const BASE_URL: &str = "https://api.exchange.coinbase.com";

/// Maximum candles per request
const MAX_CANDLES: i64 = 300;

/// Index of the close price in a candle row
const CLOSE_IDX: usize = 4;

/// Coinbase price source for one product
pub struct CoinbaseSource {
    client: Client,
    product: String,
    base_url: String,
}

impl CoinbaseSource {
    /// Create a new Coinbase source
    ///
    /// # Arguments
    /// * `product` - Product id (e.g., "BTC-USD")
    /// * `timeout` - HTTP timeout per request
    pub fn new(product: impl Into<String>, timeout: StdDuration) -> Result<Self, SourceError> {
        // Coinbase rejects requests without a User-Agent
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pricesignal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            product: product.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch one page of candles in `[start, end]`
    async fn get_candles(
        &self,
        resolution: Resolution,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, SourceError> {
        let url = format!(
            "{}/products/{}/candles?granularity={}&start={}&end={}",
            self.base_url,
            self.product,
            resolution.step_secs(),
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        debug!("Fetching Coinbase candles: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Coinbase returned HTTP {}", status);
            return Err(SourceError::from_status(status));
        }

        let body = response.text().await?;
        let rows: Vec<Vec<f64>> = serde_json::from_str(&body)?;

        Ok(parse_candles(rows))
    }
}

/// Convert newest-first candle rows to oldest-first points
fn parse_candles(rows: Vec<Vec<f64>>) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = rows
        .into_iter()
        .filter_map(|row| {
            let time = *row.first()?;
            let close = *row.get(CLOSE_IDX)?;
            Some(PricePoint::new(time as i64 * 1000, close))
        })
        .collect();

    points.reverse();
    points
}

#[async_trait]
impl SeriesSource for CoinbaseSource {
    fn name(&self) -> &str {
        "coinbase"
    }

    async fn fetch_series(
        &self,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries, SourceError> {
        let step = Duration::seconds(resolution.step_secs());
        let page_span = step * MAX_CANDLES as i32;

        let end = Utc::now();
        let start = end - Duration::days(window_days as i64);

        let mut all_points = Vec::with_capacity(resolution.points_in_window(window_days));
        let mut page_start = start;

        while page_start < end {
            let page_end = (page_start + page_span).min(end);
            let batch = self.get_candles(resolution, page_start, page_end).await?;

            debug!(
                "Coinbase page {} -> {}: {} candles",
                page_start, page_end, batch.len()
            );

            all_points.extend(batch);
            page_start = page_end + step;
        }

        if all_points.is_empty() {
            return Err(SourceError::NoData);
        }

        // Pages overlap at the edges and each page is newest-first
        let series = PriceSeries::normalized(all_points);

        info!(
            "Fetched {} {} points for {} from Coinbase",
            series.len(),
            resolution.as_str(),
            self.product
        );

        Ok(series)
    }
}
