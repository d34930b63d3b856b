//! Full signal pipeline and dashboard snapshot
//!
//! hourly + daily fetch (concurrent, each with its own failover)
//!   -> 1h / 4h (resampled) / 1d evaluation
//!   -> cross-timeframe consensus
//!
//! The dashboard runs the pipeline next to independent sections (fear &
//! greed) that share no state with it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{AggregateResult, EvaluationResult, PriceSeries, Resolution, Timeframe};
use crate::services::consensus::aggregate;
use crate::services::evaluator::evaluate_timeframe;
use crate::services::failover::FailoverFetcher;
use crate::services::fear_greed::{FearGreedClient, FearGreedReading};
use crate::services::resampler::Resampler;

/// Per-timeframe results plus the master signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub hourly: EvaluationResult,
    pub four_hour: EvaluationResult,
    pub daily: EvaluationResult,
    pub aggregate: AggregateResult,
}

impl SignalReport {
    /// Results ordered short to long horizon
    pub fn timeframes(&self) -> [&EvaluationResult; 3] {
        [&self.hourly, &self.four_hour, &self.daily]
    }
}

/// Evaluate already-fetched hourly and daily series
pub fn evaluate_report(hourly: &PriceSeries, daily: &PriceSeries) -> SignalReport {
    let four_hour_series = Resampler::resample_to_four_hour(hourly);

    let hourly_result = evaluate_timeframe(Timeframe::Hour1, hourly);
    let four_hour_result = evaluate_timeframe(Timeframe::Hour4, &four_hour_series);
    let daily_result = evaluate_timeframe(Timeframe::Day1, daily);

    let aggregate = aggregate(&hourly_result, &four_hour_result, &daily_result);

    SignalReport {
        hourly: hourly_result,
        four_hour: four_hour_result,
        daily: daily_result,
        aggregate,
    }
}

/// Fetch hourly and daily series and evaluate them
///
/// Either fetch failing surfaces as `DataUnavailable`; no partial report is
/// produced.
pub async fn build_signal_report(fetcher: &FailoverFetcher) -> Result<SignalReport> {
    let config = fetcher.config();

    let (hourly, daily) = tokio::try_join!(
        fetcher.fetch_with_failover(config.window_days(Resolution::Hourly), Resolution::Hourly),
        fetcher.fetch_with_failover(config.window_days(Resolution::Daily), Resolution::Daily),
    )?;

    info!(
        "Evaluating {} hourly and {} daily points",
        hourly.len(),
        daily.len()
    );

    let report = evaluate_report(&hourly, &daily);

    info!(
        "Master signal: {} ({})",
        report.aggregate.tone, report.aggregate.label
    );

    Ok(report)
}

/// Everything one dashboard refresh needs
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub signal: Result<SignalReport>,
    pub fear_greed: Option<FearGreedReading>,
}

/// Run the signal pipeline and the fear & greed fetch concurrently
pub async fn build_dashboard(
    fetcher: &FailoverFetcher,
    fear_greed: &FearGreedClient,
) -> DashboardSnapshot {
    let (signal, fear_greed) =
        tokio::join!(build_signal_report(fetcher), fear_greed.fetch_latest());

    let fear_greed = match fear_greed {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!("Fear & greed unavailable: {}", e);
            None
        }
    };

    DashboardSnapshot { signal, fear_greed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FetchConfig, PricePoint, Tone};
    use crate::services::series_source::{SeriesSource, SourceError};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Rising trend with a +/-5 zigzag, so every timeframe reads strong-up
    fn uptrend(len: usize, step_ms: i64) -> PriceSeries {
        PriceSeries::new(
            (0..len)
                .map(|i| {
                    let zigzag = if i % 2 == 0 { 5.0 } else { -5.0 };
                    PricePoint::new(i as i64 * step_ms, 1000.0 + 0.1 * i as f64 + zigzag)
                })
                .collect(),
        )
    }

    struct UptrendSource;

    #[async_trait]
    impl SeriesSource for UptrendSource {
        fn name(&self) -> &str {
            "uptrend"
        }

        async fn fetch_series(
            &self,
            window_days: u32,
            resolution: Resolution,
        ) -> std::result::Result<PriceSeries, SourceError> {
            Ok(uptrend(
                resolution.points_in_window(window_days),
                resolution.step_secs() * 1000,
            ))
        }
    }

    struct DownSource;

    #[async_trait]
    impl SeriesSource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        async fn fetch_series(
            &self,
            _: u32,
            _: Resolution,
        ) -> std::result::Result<PriceSeries, SourceError> {
            Err(SourceError::NoData)
        }
    }

    fn config() -> FetchConfig {
        FetchConfig {
            rate_limit_backoff: Duration::from_millis(1),
            deadline: None,
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_evaluate_report_uses_resampled_four_hour() {
        // 2000 hourly points -> 500 four-hour points
        let hourly = uptrend(2000, 3_600_000);
        let daily = uptrend(500, 86_400_000);

        let report = evaluate_report(&hourly, &daily);

        assert_eq!(report.hourly.timeframe, Timeframe::Hour1);
        assert_eq!(report.four_hour.timeframe, Timeframe::Hour4);
        assert_eq!(report.daily.timeframe, Timeframe::Day1);
        assert!(!report.four_hour.low_confidence);
        assert_eq!(report.four_hour.price, hourly.last().map(|p| p.price));
    }

    #[test]
    fn test_short_hourly_history_degrades_four_hour_only() {
        // 1000 hourly points -> 250 four-hour points (< 410)
        let hourly = uptrend(1000, 3_600_000);
        let daily = uptrend(500, 86_400_000);

        let report = evaluate_report(&hourly, &daily);

        assert!(!report.hourly.low_confidence);
        assert!(report.four_hour.low_confidence);
        assert_eq!(report.four_hour.tone, Tone::Neutral);
    }

    #[tokio::test]
    async fn test_build_signal_report() {
        let fetcher = FailoverFetcher::new(
            vec![Box::new(DownSource), Box::new(UptrendSource)],
            config(),
        );

        let report = build_signal_report(&fetcher).await.unwrap();

        // 90 days hourly = 2160 points, 450 daily points: all strong-up
        for result in report.timeframes() {
            assert_eq!(result.tone, Tone::Buy, "{}", result.timeframe);
        }
        assert_eq!(report.aggregate.tone, Tone::Buy);
        assert_eq!(report.aggregate.label, "strong buy");
    }

    #[tokio::test]
    async fn test_build_signal_report_data_unavailable() {
        let fetcher = FailoverFetcher::new(vec![Box::new(DownSource)], config());

        let err = build_signal_report(&fetcher).await.unwrap_err();

        assert!(err.is_data_unavailable());
    }
}
