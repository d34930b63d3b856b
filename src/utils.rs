use crate::error::{AppError, Result};
use crate::models::{AssetConfig, FetchConfig};
use crate::services::FailoverFetcher;

/// Resolve an asset preset name from the CLI
pub fn resolve_asset(name: &str) -> Result<AssetConfig> {
    AssetConfig::from_preset(name).map_err(AppError::InvalidInput)
}

/// Build the default failover fetcher from environment config
pub fn build_fetcher(asset_name: &str) -> Result<FailoverFetcher> {
    let asset = resolve_asset(asset_name)?;
    FailoverFetcher::with_default_sources(&asset, FetchConfig::from_env())
}

/// Format an optional number with fixed decimals, "-" when missing
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}
