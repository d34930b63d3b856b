//! Multi-timeframe signal command
//!
//! Fetches hourly and daily history through the provider failover chain,
//! evaluates 1h / 4h / 1d and prints the master signal.
//!
//! Usage:
//! - `signal`
//! - `signal --asset eth --json`

use crate::models::EvaluationResult;
use crate::services::{build_signal_report, SignalReport};
use crate::utils::{build_fetcher, format_optional};

/// Run signal command
///
/// # Arguments
/// * `asset` - Asset preset ("btc", "eth")
/// * `json` - Print the report as JSON
pub async fn run(asset: String, json: bool) {
    let fetcher = match build_fetcher(&asset) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    match build_signal_report(&fetcher).await {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("❌ Failed to serialize report: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_report(&asset, &report);
            }
        }
        Err(e) if e.is_data_unavailable() => {
            eprintln!("⚠️  Data unavailable: {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

pub(crate) fn print_report(asset: &str, report: &SignalReport) {
    println!("📊 {} signal\n", asset.to_uppercase());
    println!(
        "   {:<4} {:<8} {:<12} {:>7} {:<11} {:<7} {}",
        "TF", "TONE", "STATUS", "RSI", "WARNING", "CROSS", "RECOMMENDATION"
    );

    for result in report.timeframes() {
        print_row(result);
    }

    println!(
        "\n🎯 Master: {} ({})",
        report.aggregate.tone, report.aggregate.label
    );
}

fn print_row(result: &EvaluationResult) {
    let status = result
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "   {:<4} {:<8} {:<12} {:>7} {:<11} {:<7} {}",
        result.timeframe.to_string(),
        result.tone.to_string(),
        status,
        format_optional(result.rsi_value, 1),
        result.rsi_warning.to_string(),
        result.cross_signal.to_string(),
        result.recommendation
    );

    if !result.low_confidence {
        println!(
            "        price {}  ma50 {}  ma200 {}  ma400 {}",
            format_optional(result.price, 2),
            format_optional(result.ma50, 2),
            format_optional(result.ma200, 2),
            format_optional(result.ma400, 2)
        );
    }
}
