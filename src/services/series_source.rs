//! Price series provider abstraction
//!
//! Each upstream API implements [`SeriesSource`]. Implementations convert
//! their native timestamps to milliseconds and return whatever they received;
//! the failover fetcher normalizes ordering and drops invalid prices.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use thiserror::Error as ThisError;

use crate::models::{PriceSeries, Resolution};

/// Single-provider failure
#[derive(ThisError, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] ReqwestError),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),

    /// Transient; the fetcher retries with a fixed backoff
    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("No data returned")]
    NoData,
}

impl From<serde_json::Error> for SourceError {
    fn from(error: serde_json::Error) -> Self {
        SourceError::Parse(error.to_string())
    }
}

impl SourceError {
    /// Map a non-success HTTP status (429 is rate limiting)
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            SourceError::RateLimited
        } else {
            SourceError::Status(status.as_u16())
        }
    }
}

/// A provider of (timestamp, price) history for one configured asset
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Short provider name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch `window_days` of history at `resolution`
    async fn fetch_series(
        &self,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries, SourceError>;
}
