//! CoinGecko market chart source
//!
//! `GET /api/v3/coins/{id}/market_chart?vs_currency=usd&days=N`
//!
//! CoinGecko picks granularity from the window: 2-90 days returns hourly
//! points, longer windows return daily points. Hourly requests are capped at
//! 90 days; daily requests add `interval=daily`. The public API only serves
//! the last 365 days, so longer daily windows are refused without a request
//! and the fetcher moves on. Timestamps are already in milliseconds.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::{debug, info, warn};

use crate::models::{PricePoint, PriceSeries, Resolution};
use crate::services::series_source::{SeriesSource, SourceError};

/// Base URL for the public CoinGecko API
const BASE_URL: &str = "https://api.coingecko.com";

/// Longest window CoinGecko serves at hourly granularity
const MAX_HOURLY_DAYS: u32 = 90;

/// Longest history the public API serves
const MAX_DAILY_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, Option<f64>)>,
}

/// CoinGecko price source for one coin id
pub struct CoinGeckoSource {
    client: Client,
    coin_id: String,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoSource {
    /// Create a new CoinGecko source
    ///
    /// # Arguments
    /// * `coin_id` - CoinGecko coin id (e.g., "bitcoin")
    /// * `api_key` - Optional demo API key (`x-cg-demo-api-key` header)
    /// * `timeout` - HTTP timeout per request
    pub fn new(
        coin_id: impl Into<String>,
        api_key: Option<String>,
        timeout: StdDuration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            coin_id: coin_id.into(),
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, window_days: u32, resolution: Resolution) -> String {
        match resolution {
            Resolution::Hourly => {
                let days = window_days.clamp(2, MAX_HOURLY_DAYS);
                if days != window_days {
                    warn!(
                        "CoinGecko hourly window {}d adjusted to {}d",
                        window_days, days
                    );
                }
                format!(
                    "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days={}",
                    self.base_url, self.coin_id, days
                )
            }
            Resolution::Daily => format!(
                "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
                self.base_url, self.coin_id, window_days
            ),
        }
    }
}

/// Convert `[ms, price]` pairs, dropping null prices
fn parse_prices(prices: Vec<(f64, Option<f64>)>) -> Vec<PricePoint> {
    prices
        .into_iter()
        .filter_map(|(timestamp_ms, price)| {
            if !timestamp_ms.is_finite() {
                return None;
            }
            price.map(|p| PricePoint::new(timestamp_ms as i64, p))
        })
        .collect()
}

#[async_trait]
impl SeriesSource for CoinGeckoSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_series(
        &self,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries, SourceError> {
        if matches!(resolution, Resolution::Daily) && window_days > MAX_DAILY_DAYS {
            warn!(
                "CoinGecko serves at most {}d of history, {}d requested",
                MAX_DAILY_DAYS, window_days
            );
            return Err(SourceError::Api(format!(
                "daily window {}d exceeds {}d limit",
                window_days, MAX_DAILY_DAYS
            )));
        }

        let url = self.build_url(window_days, resolution);
        debug!("Fetching CoinGecko data: {}", url);

        let mut request = self.client.get(&url);
        if let Some(ref api_key) = self.api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("CoinGecko returned HTTP {}", status);
            return Err(SourceError::from_status(status));
        }

        let body = response.text().await?;
        let chart: MarketChartResponse = serde_json::from_str(&body)?;

        if chart.prices.is_empty() {
            return Err(SourceError::NoData);
        }

        let series = PriceSeries::normalized(parse_prices(chart.prices));

        info!(
            "Fetched {} {} points for {} from CoinGecko",
            series.len(),
            resolution.as_str(),
            self.coin_id
        );

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> CoinGeckoSource {
        CoinGeckoSource::new("bitcoin", None, StdDuration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_market_chart() {
        let body = r#"{
            "prices": [[1700000000000, 35000.5], [1700003600000, null], [1700007200000, 35100.25]],
            "market_caps": [],
            "total_volumes": []
        }"#;

        let chart: MarketChartResponse = serde_json::from_str(body).unwrap();
        let points = parse_prices(chart.prices);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], PricePoint::new(1_700_000_000_000, 35000.5));
        assert_eq!(points[1], PricePoint::new(1_700_007_200_000, 35100.25));
    }

    #[test]
    fn test_build_url() {
        let source = source().with_base_url("http://localhost:8080/");

        assert_eq!(
            source.build_url(365, Resolution::Hourly),
            "http://localhost:8080/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=90"
        );
        assert_eq!(
            source.build_url(500, Resolution::Daily),
            "http://localhost:8080/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=500&interval=daily"
        );
    }

    #[tokio::test]
    async fn test_daily_window_over_limit_skips_request() {
        // Nothing listens here, so only the limit check can produce an Api error
        let source = source().with_base_url("http://127.0.0.1:1");

        let err = source.fetch_series(450, Resolution::Daily).await.unwrap_err();
        assert!(matches!(err, SourceError::Api(_)), "got {:?}", err);

        let err = source.fetch_series(365, Resolution::Daily).await.unwrap_err();
        assert!(!matches!(err, SourceError::Api(_)), "got {:?}", err);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_bitcoin_hourly() {
        let series = source().fetch_series(30, Resolution::Hourly).await.unwrap();
        assert!(series.len() > 100);
    }
}
