//! Ordered multi-provider fetch
//!
//! Providers are tried one after another in priority order. A result is
//! accepted only when its normalized series has at least
//! `FetchConfig::min_points` points. Rate-limited providers get a bounded
//! number of extra attempts with a fixed backoff; any other failure moves
//! straight to the next provider.

use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{AssetConfig, FetchConfig, PriceSeries, Resolution};
use crate::services::coinbase::CoinbaseSource;
use crate::services::coingecko::CoinGeckoSource;
use crate::services::crypto_compare::CryptoCompareSource;
use crate::services::series_source::{SeriesSource, SourceError};

/// Tries an ordered list of sources until one returns enough data
pub struct FailoverFetcher {
    sources: Vec<Box<dyn SeriesSource>>,
    config: FetchConfig,
}

impl FailoverFetcher {
    pub fn new(sources: Vec<Box<dyn SeriesSource>>, config: FetchConfig) -> Self {
        Self { sources, config }
    }

    /// Default provider chain for an asset: CoinGecko, CryptoCompare, Coinbase
    pub fn with_default_sources(asset: &AssetConfig, config: FetchConfig) -> Result<Self> {
        let to_config_error =
            |e: SourceError| AppError::Config(format!("Failed to create HTTP client: {}", e));

        let sources: Vec<Box<dyn SeriesSource>> = vec![
            Box::new(
                CoinGeckoSource::new(
                    asset.coingecko_id.clone(),
                    config.coingecko_api_key.clone(),
                    config.request_timeout,
                )
                .map_err(to_config_error)?,
            ),
            Box::new(
                CryptoCompareSource::new(
                    asset.cryptocompare_symbol.clone(),
                    config.cryptocompare_api_key.clone(),
                    config.request_timeout,
                )
                .map_err(to_config_error)?,
            ),
            Box::new(
                CoinbaseSource::new(asset.coinbase_product.clone(), config.request_timeout)
                    .map_err(to_config_error)?,
            ),
        ];

        Ok(Self::new(sources, config))
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Provider names in priority order
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fetch `window_days` of history at `resolution` from the first
    /// acceptable provider
    ///
    /// # Returns
    /// * `Ok(series)` - normalized series (ascending, finite, unique timestamps)
    /// * `Err(AppError::DataUnavailable)` - every provider failed or was too
    ///   short, or the configured deadline expired
    pub async fn fetch_with_failover(
        &self,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries> {
        match self.config.deadline {
            Some(deadline) => {
                match timeout(deadline, self.try_sources(window_days, resolution)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            "{} fetch exceeded deadline of {:?}",
                            resolution.as_str(),
                            deadline
                        );
                        Err(AppError::DataUnavailable(format!(
                            "deadline of {:?} exceeded",
                            deadline
                        )))
                    }
                }
            }
            None => self.try_sources(window_days, resolution).await,
        }
    }

    async fn try_sources(&self, window_days: u32, resolution: Resolution) -> Result<PriceSeries> {
        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            match self.attempt_source(source.as_ref(), window_days, resolution).await {
                Ok(series) => {
                    info!(
                        "Accepted {} points ({}) from {}",
                        series.len(),
                        resolution.as_str(),
                        source.name()
                    );
                    return Ok(series);
                }
                Err(e) => {
                    warn!("{}", e);
                    failures.push(e.to_string());
                }
            }
        }

        Err(AppError::DataUnavailable(if failures.is_empty() {
            "no providers configured".to_string()
        } else {
            failures.join("; ")
        }))
    }

    /// One provider: bounded rate-limit retries, normalization, length check
    async fn attempt_source(
        &self,
        source: &dyn SeriesSource,
        window_days: u32,
        resolution: Resolution,
    ) -> Result<PriceSeries> {
        let max_attempts = self.config.rate_limit_max_attempts.max(1);
        let mut attempt = 1;

        let raw = loop {
            debug!(
                "Requesting {}d {} from {} (attempt {}/{})",
                window_days,
                resolution.as_str(),
                source.name(),
                attempt,
                max_attempts
            );

            match source.fetch_series(window_days, resolution).await {
                Ok(series) => break series,
                Err(SourceError::RateLimited) if attempt < max_attempts => {
                    warn!(
                        "{} rate limited, retrying in {:?} (attempt {}/{})",
                        source.name(),
                        self.config.rate_limit_backoff,
                        attempt,
                        max_attempts
                    );
                    sleep(self.config.rate_limit_backoff).await;
                    attempt += 1;
                }
                Err(SourceError::RateLimited) => {
                    return Err(AppError::ProviderUnavailable {
                        provider: source.name().to_string(),
                        reason: format!("rate limited after {} attempts", attempt),
                    });
                }
                Err(e) => {
                    return Err(AppError::ProviderUnavailable {
                        provider: source.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        };

        let series = PriceSeries::normalized(raw.into_points());

        if series.len() < self.config.min_points {
            return Err(AppError::ProviderUnavailable {
                provider: source.name().to_string(),
                reason: format!(
                    "only {} points, need at least {}",
                    series.len(),
                    self.config.min_points
                ),
            });
        }

        Ok(series)
    }
}
