//! Dashboard command: signal plus fear & greed index, fetched concurrently

use serde_json::json;

use crate::models::FetchConfig;
use crate::services::{build_dashboard, FearGreedClient};
use crate::utils::build_fetcher;

use super::signal::print_report;

/// Run dashboard command
pub async fn run(asset: String, json_output: bool) {
    let fetcher = match build_fetcher(&asset) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let fear_greed_client = match FearGreedClient::new(FetchConfig::from_env().request_timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let snapshot = build_dashboard(&fetcher, &fear_greed_client).await;

    if json_output {
        let signal = match &snapshot.signal {
            Ok(report) => json!({ "report": report }),
            Err(e) => json!({
                "error": e.to_string(),
                "data_unavailable": e.is_data_unavailable(),
            }),
        };
        let body = json!({
            "signal": signal,
            "fear_greed": snapshot.fear_greed,
        });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize dashboard: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match &snapshot.fear_greed {
        Some(reading) => println!(
            "😨 Fear & Greed: {} ({})\n",
            reading.value, reading.classification
        ),
        None => println!("😨 Fear & Greed: unavailable\n"),
    }

    match &snapshot.signal {
        Ok(report) => print_report(&asset, report),
        Err(e) if e.is_data_unavailable() => {
            println!("⚠️  Signal data unavailable: {}", e);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
