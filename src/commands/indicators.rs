//! Indicator snapshot command
//!
//! Fetches one series and prints the latest SMA / RSI / MACD values.
//!
//! Usage:
//! - `indicators --resolution 1h --window-days 30`

use serde::Serialize;

use crate::models::indicators::{compute_indicators, last_defined};
use crate::models::Resolution;
use crate::utils::{build_fetcher, format_optional};

#[derive(Debug, Serialize)]
struct IndicatorSnapshot {
    resolution: Resolution,
    points: usize,
    last_timestamp_ms: Option<i64>,
    price: Option<f64>,
    sma50: Option<f64>,
    sma200: Option<f64>,
    sma400: Option<f64>,
    rsi: Option<f64>,
    macd_line: Option<f64>,
    macd_signal: Option<f64>,
    macd_histogram: Option<f64>,
}

/// Run indicators command
///
/// # Arguments
/// * `asset` - Asset preset ("btc", "eth")
/// * `resolution_str` - "1h" or "1d"
/// * `window_days` - Lookback override (default from config)
/// * `json` - Print the snapshot as JSON
pub async fn run(asset: String, resolution_str: String, window_days: Option<u32>, json: bool) {
    let resolution = match Resolution::from_str(&resolution_str) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let fetcher = match build_fetcher(&asset) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let window_days = window_days.unwrap_or_else(|| fetcher.config().window_days(resolution));

    let series = match fetcher.fetch_with_failover(window_days, resolution).await {
        Ok(series) => series,
        Err(e) if e.is_data_unavailable() => {
            eprintln!("⚠️  Data unavailable: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let set = compute_indicators(&series);

    let snapshot = IndicatorSnapshot {
        resolution,
        points: series.len(),
        last_timestamp_ms: series.last().map(|p| p.timestamp_ms),
        price: series.last().map(|p| p.price),
        sma50: last_defined(&set.sma50),
        sma200: last_defined(&set.sma200),
        sma400: last_defined(&set.sma400),
        rsi: last_defined(&set.rsi),
        macd_line: last_defined(&set.macd.line),
        macd_signal: last_defined(&set.macd.signal),
        macd_histogram: last_defined(&set.macd.histogram),
    };

    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize snapshot: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let last_time = series
        .last()
        .and_then(|p| p.time())
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "📈 {} {} indicators ({} points, last {})\n",
        asset.to_uppercase(),
        resolution.as_str(),
        snapshot.points,
        last_time
    );
    println!("   Price:     {}", format_optional(snapshot.price, 2));
    println!("   SMA(50):   {}", format_optional(snapshot.sma50, 2));
    println!("   SMA(200):  {}", format_optional(snapshot.sma200, 2));
    println!("   SMA(400):  {}", format_optional(snapshot.sma400, 2));
    println!("   RSI(14):   {}", format_optional(snapshot.rsi, 1));
    println!(
        "   MACD:      {} / signal {} / hist {}",
        format_optional(snapshot.macd_line, 2),
        format_optional(snapshot.macd_signal, 2),
        format_optional(snapshot.macd_histogram, 2)
    );
}
