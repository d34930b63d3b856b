use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::MIN_ACCEPTED_POINTS;

/// Resolution requested from a price provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// One point per hour
    Hourly,
    /// One point per day
    Daily,
}

impl Resolution {
    /// Seconds between two consecutive points
    pub fn step_secs(&self) -> i64 {
        match self {
            Resolution::Hourly => 3_600,
            Resolution::Daily => 86_400,
        }
    }

    /// Number of points covering `window_days`
    pub fn points_in_window(&self, window_days: u32) -> usize {
        match self {
            Resolution::Hourly => window_days as usize * 24,
            Resolution::Daily => window_days as usize,
        }
    }

    /// Short label ("1h", "1d")
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hourly => "1h",
            Resolution::Daily => "1d",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "1H" | "HOURLY" => Ok(Resolution::Hourly),
            "1D" | "DAILY" => Ok(Resolution::Daily),
            _ => Err(format!("Invalid resolution: {}. Valid options: 1h, 1d", s)),
        }
    }
}

/// Per-provider identifiers for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// CoinGecko coin id (e.g., "bitcoin")
    pub coingecko_id: String,

    /// CryptoCompare symbol (e.g., "BTC")
    pub cryptocompare_symbol: String,

    /// Coinbase Exchange product id (e.g., "BTC-USD")
    pub coinbase_product: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::bitcoin()
    }
}

impl AssetConfig {
    pub fn bitcoin() -> Self {
        Self {
            coingecko_id: "bitcoin".to_string(),
            cryptocompare_symbol: "BTC".to_string(),
            coinbase_product: "BTC-USD".to_string(),
        }
    }

    pub fn ethereum() -> Self {
        Self {
            coingecko_id: "ethereum".to_string(),
            cryptocompare_symbol: "ETH".to_string(),
            coinbase_product: "ETH-USD".to_string(),
        }
    }

    /// Resolve a preset name ("btc", "eth")
    pub fn from_preset(name: &str) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "btc" | "bitcoin" => Ok(Self::bitcoin()),
            "eth" | "ethereum" => Ok(Self::ethereum()),
            _ => Err(format!("Unknown asset preset: {}. Valid options: btc, eth", name)),
        }
    }
}

/// Configuration for one failover fetch cycle
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Lookback for hourly series (1h and 4h timeframes)
    pub hourly_window_days: u32,

    /// Lookback for daily series
    pub daily_window_days: u32,

    /// Minimum normalized points for a provider result to be accepted
    pub min_points: usize,

    /// Attempts per provider when it reports rate limiting
    pub rate_limit_max_attempts: u32,

    /// Fixed wait between rate-limited attempts
    pub rate_limit_backoff: Duration,

    /// HTTP timeout for a single provider request
    pub request_timeout: Duration,

    /// Overall deadline for one failover run (None = no deadline)
    pub deadline: Option<Duration>,

    /// Optional CoinGecko demo API key
    pub coingecko_api_key: Option<String>,

    /// Optional CryptoCompare API key
    pub cryptocompare_api_key: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            hourly_window_days: 90,
            daily_window_days: 450,
            min_points: MIN_ACCEPTED_POINTS,
            rate_limit_max_attempts: 2,
            rate_limit_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            deadline: Some(Duration::from_secs(60)),
            coingecko_api_key: None,
            cryptocompare_api_key: None,
        }
    }
}

impl FetchConfig {
    /// Build config from environment variables, falling back to defaults
    ///
    /// - `HOURLY_WINDOW_DAYS`, `DAILY_WINDOW_DAYS`
    /// - `FETCH_DEADLINE_SECS` (0 disables the deadline)
    /// - `COINGECKO_API_KEY`, `CRYPTOCOMPARE_API_KEY`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let hourly_window_days =
            env_parse("HOURLY_WINDOW_DAYS").unwrap_or(defaults.hourly_window_days);
        let daily_window_days =
            env_parse("DAILY_WINDOW_DAYS").unwrap_or(defaults.daily_window_days);

        let deadline = match env_parse::<u64>("FETCH_DEADLINE_SECS") {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.deadline,
        };

        Self {
            hourly_window_days,
            daily_window_days,
            deadline,
            coingecko_api_key: env_non_empty("COINGECKO_API_KEY"),
            cryptocompare_api_key: env_non_empty("CRYPTOCOMPARE_API_KEY"),
            ..defaults
        }
    }

    /// Lookback window for a resolution
    pub fn window_days(&self, resolution: Resolution) -> u32 {
        match resolution {
            Resolution::Hourly => self.hourly_window_days,
            Resolution::Daily => self.daily_window_days,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_window_points() {
        assert_eq!(Resolution::Hourly.points_in_window(90), 2160);
        assert_eq!(Resolution::Daily.points_in_window(500), 500);
        assert_eq!(Resolution::Hourly.step_secs(), 3_600);
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!(Resolution::from_str("1h"), Ok(Resolution::Hourly));
        assert_eq!(Resolution::from_str("DAILY"), Ok(Resolution::Daily));
        assert!(Resolution::from_str("1m").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.min_points, 10);
        assert_eq!(config.window_days(Resolution::Hourly), 90);
        assert_eq!(config.window_days(Resolution::Daily), 450);
        assert!(config.rate_limit_max_attempts >= 2);
    }

    #[test]
    fn test_asset_presets() {
        assert_eq!(
            AssetConfig::from_preset("ETH").map(|a| a.coinbase_product),
            Ok("ETH-USD".to_string())
        );
        assert!(AssetConfig::from_preset("doge").is_err());
    }
}
