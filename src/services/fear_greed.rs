//! Crypto Fear & Greed index client (alternative.me)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Base URL for the alternative.me API
const BASE_URL: &str = "https://api.alternative.me";

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    #[serde(default)]
    data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
struct FearGreedEntry {
    value: String,
    value_classification: String,
    timestamp: String,
}

/// Latest index reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreedReading {
    /// 0 (extreme fear) to 100 (extreme greed)
    pub value: u8,
    pub classification: String,
    pub timestamp_ms: i64,
}

pub struct FearGreedClient {
    client: Client,
    base_url: String,
}

impl FearGreedClient {
    pub fn new(timeout: StdDuration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the most recent reading
    pub async fn fetch_latest(&self) -> Result<FearGreedReading> {
        let url = format!("{}/fng/?limit=1", self.base_url);
        debug!("Fetching fear & greed index: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Fear & greed API returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let reading = parse_reading(&body)?;

        info!(
            "Fear & greed index: {} ({})",
            reading.value, reading.classification
        );

        Ok(reading)
    }
}

fn parse_reading(body: &str) -> Result<FearGreedReading> {
    let response: FearGreedResponse = serde_json::from_str(body)?;

    let entry = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Parse("Fear & greed response has no data".to_string()))?;

    let value = entry
        .value
        .trim()
        .parse::<u8>()
        .map_err(|e| {
            AppError::Parse(format!("Invalid fear & greed value '{}': {}", entry.value, e))
        })?;

    let timestamp_secs = entry
        .timestamp
        .trim()
        .parse::<i64>()
        .map_err(|e| AppError::Parse(format!("Invalid timestamp '{}': {}", entry.timestamp, e)))?;

    Ok(FearGreedReading {
        value,
        classification: entry.value_classification,
        timestamp_ms: timestamp_secs * 1000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reading() {
        let body = r#"{
            "name": "Fear and Greed Index",
            "data": [
                {"value": "54", "value_classification": "Neutral", "timestamp": "1700000000", "time_until_update": "3600"}
            ],
            "metadata": {"error": null}
        }"#;

        let reading = parse_reading(body).unwrap();

        assert_eq!(
            reading,
            FearGreedReading {
                value: 54,
                classification: "Neutral".to_string(),
                timestamp_ms: 1_700_000_000_000,
            }
        );
    }

    #[test]
    fn test_parse_reading_empty_data() {
        let err = parse_reading(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = FearGreedClient::new(StdDuration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        let err = client.fetch_latest().await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)), "got {:?}", err);
        assert!(!err.is_data_unavailable());
    }
}
