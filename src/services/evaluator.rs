//! Per-timeframe signal evaluation
//!
//! Turns one closing-price series into an [`EvaluationResult`]:
//!
//! 1. SMA(50), SMA(200), SMA(400) and RSI(14) over the full series
//! 2. Trend status from the final SMA triple
//! 3. RSI warning (overbought >= 70, oversold <= 30)
//! 4. SMA(50) vs SMA(400) cross on the last two bars
//! 5. Tone and recommendation: a cross wins, otherwise the
//!    (status, warning) decision table
//!
//! Evaluation never fails. Series shorter than
//! [`MIN_EVALUATION_POINTS`] yield a neutral low-confidence result.

use crate::constants::{
    INSUFFICIENT_DATA_RECOMMENDATION, MIN_EVALUATION_POINTS, RSI_OVERBOUGHT, RSI_OVERSOLD,
    RSI_PERIOD, SMA_LONG_PERIOD, SMA_MEDIUM_PERIOD, SMA_SHORT_PERIOD,
};
use crate::models::indicators::{calculate_rsi, calculate_sma, last_defined};
use crate::models::{
    CrossSignal, EvaluationResult, MarketStatus, PriceSeries, RsiWarning, Timeframe, Tone,
};
use tracing::debug;

/// Evaluate one timeframe's price series
pub fn evaluate_timeframe(timeframe: Timeframe, series: &PriceSeries) -> EvaluationResult {
    evaluate_closes(timeframe, &series.closes())
}

/// Evaluate raw closes (ascending time order)
pub fn evaluate_closes(timeframe: Timeframe, closes: &[f64]) -> EvaluationResult {
    let price = closes.last().copied();

    if closes.len() < MIN_EVALUATION_POINTS {
        debug!(
            "{}: {} points < {} required, holding",
            timeframe,
            closes.len(),
            MIN_EVALUATION_POINTS
        );
        return insufficient_history(timeframe, price);
    }

    let sma50 = calculate_sma(closes, SMA_SHORT_PERIOD);
    let sma200 = calculate_sma(closes, SMA_MEDIUM_PERIOD);
    let sma400 = calculate_sma(closes, SMA_LONG_PERIOD);
    let rsi = calculate_rsi(closes, RSI_PERIOD);

    let (ma50, ma200, ma400) = match (
        last_defined(&sma50),
        last_defined(&sma200),
        last_defined(&sma400),
    ) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return insufficient_history(timeframe, price),
    };

    let rsi_value = last_defined(&rsi);
    let status = classify_status(ma50, ma200, ma400);
    let rsi_warning = classify_rsi(rsi_value);
    let cross_signal = detect_cross(&sma50, &sma400);

    let (tone, recommendation) = match cross_signal {
        CrossSignal::Golden => (Tone::Buy, "strong buy (golden cross)"),
        CrossSignal::Dead => (Tone::Sell, "strong sell (dead cross)"),
        CrossSignal::None => decide(status, rsi_warning),
    };

    debug!(
        "{}: status={} rsi={:?} warning={} cross={} -> {} ({})",
        timeframe, status, rsi_value, rsi_warning, cross_signal, tone, recommendation
    );

    EvaluationResult {
        timeframe,
        tone,
        status: Some(status),
        rsi_value,
        rsi_warning,
        cross_signal,
        ma50: Some(ma50),
        ma200: Some(ma200),
        ma400: Some(ma400),
        price,
        recommendation: recommendation.to_string(),
        low_confidence: false,
    }
}

fn insufficient_history(timeframe: Timeframe, price: Option<f64>) -> EvaluationResult {
    EvaluationResult {
        timeframe,
        tone: Tone::Neutral,
        status: None,
        rsi_value: None,
        rsi_warning: RsiWarning::Normal,
        cross_signal: CrossSignal::None,
        ma50: None,
        ma200: None,
        ma400: None,
        price,
        recommendation: INSUFFICIENT_DATA_RECOMMENDATION.to_string(),
        low_confidence: true,
    }
}

/// Classify trend from the final SMA(50), SMA(200), SMA(400)
pub fn classify_status(ma50: f64, ma200: f64, ma400: f64) -> MarketStatus {
    if ma50 > ma200 && ma200 > ma400 {
        MarketStatus::StrongUp
    } else if ma50 > ma200 && ma200 < ma400 {
        MarketStatus::WeakUp
    } else if ma50 < ma200 && ma200 > ma400 {
        MarketStatus::WeakDown
    } else {
        MarketStatus::StrongDown
    }
}

/// Classify the final RSI value; undefined RSI counts as normal
pub fn classify_rsi(rsi: Option<f64>) -> RsiWarning {
    match rsi {
        Some(value) if value >= RSI_OVERBOUGHT => RsiWarning::Overbought,
        Some(value) if value <= RSI_OVERSOLD => RsiWarning::Oversold,
        _ => RsiWarning::Normal,
    }
}

/// Detect a sign change of `short - long` between the last two indices
///
/// `<= 0` to `> 0` is golden, `>= 0` to `< 0` is dead.
pub fn detect_cross(short: &[f64], long: &[f64]) -> CrossSignal {
    let len = short.len().min(long.len());
    if len < 2 {
        return CrossSignal::None;
    }

    let prev = short[len - 2] - long[len - 2];
    let curr = short[len - 1] - long[len - 1];

    if prev.is_nan() || curr.is_nan() {
        CrossSignal::None
    } else if prev <= 0.0 && curr > 0.0 {
        CrossSignal::Golden
    } else if prev >= 0.0 && curr < 0.0 {
        CrossSignal::Dead
    } else {
        CrossSignal::None
    }
}

/// Decision table keyed by (status, RSI warning)
pub fn decide(status: MarketStatus, warning: RsiWarning) -> (Tone, &'static str) {
    use MarketStatus::*;
    use RsiWarning::*;

    match (status, warning) {
        (StrongDown, Overbought) => (Tone::Sell, "strong sell"),
        (StrongDown, Oversold) => (Tone::Neutral, "short-term buy"),
        (StrongDown, Normal) => (Tone::Sell, "sell"),

        (WeakDown | WeakUp, Overbought) => (Tone::Neutral, "short-term sell"),
        (WeakDown | WeakUp, Oversold) => (Tone::Neutral, "short-term buy"),
        (WeakDown | WeakUp, Normal) => (Tone::Neutral, "avoid"),

        (StrongUp, Overbought) => (Tone::Buy, "buy with caution"),
        (StrongUp, Oversold) => (Tone::Buy, "strong buy"),
        (StrongUp, Normal) => (Tone::Buy, "buy"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;

    /// Rising trend with a +/-5 zigzag that keeps RSI near 50
    fn uptrend_closes(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let zigzag = if i % 2 == 0 { 5.0 } else { -5.0 };
                1000.0 + 0.1 * i as f64 + zigzag
            })
            .collect()
    }

    fn flat_then_last(len: usize, flat: f64, last: f64) -> Vec<f64> {
        let mut closes = vec![flat; len - 1];
        closes.push(last);
        closes
    }

    #[test]
    fn test_strong_up_with_normal_rsi_is_buy() {
        let closes = uptrend_closes(500);
        let result = evaluate_closes(Timeframe::Day1, &closes);

        assert_eq!(result.status, Some(MarketStatus::StrongUp));
        assert_eq!(result.rsi_warning, RsiWarning::Normal);
        assert_eq!(result.cross_signal, CrossSignal::None);
        assert_eq!(result.tone, Tone::Buy);
        assert_eq!(result.recommendation, "buy");
        assert!(!result.low_confidence);

        let rsi = result.rsi_value.unwrap();
        assert!(rsi > 40.0 && rsi < 60.0, "rsi was {}", rsi);
    }

    #[test]
    fn test_evaluate_timeframe_uses_series_closes() {
        let points: Vec<PricePoint> = uptrend_closes(500)
            .into_iter()
            .enumerate()
            .map(|(i, price)| PricePoint::new(i as i64 * 86_400_000, price))
            .collect();
        let series = PriceSeries::new(points);

        let result = evaluate_timeframe(Timeframe::Day1, &series);

        assert_eq!(result.timeframe, Timeframe::Day1);
        assert_eq!(result.price, series.last().map(|p| p.price));
        assert_eq!(result.tone, Tone::Buy);
    }

    #[test]
    fn test_409_points_is_insufficient() {
        let closes = uptrend_closes(409);
        let result = evaluate_closes(Timeframe::Hour1, &closes);

        assert!(result.low_confidence);
        assert_eq!(result.tone, Tone::Neutral);
        assert_eq!(result.recommendation, INSUFFICIENT_DATA_RECOMMENDATION);
        assert_eq!(result.status, None);
        assert_eq!(result.rsi_value, None);
        assert_eq!(result.ma50, None);
        assert_eq!(result.ma400, None);
        assert_eq!(result.cross_signal, CrossSignal::None);
        // Raw last close is still reported
        assert_eq!(result.price, closes.last().copied());
    }

    #[test]
    fn test_410_points_is_evaluated() {
        let closes = uptrend_closes(410);
        let result = evaluate_closes(Timeframe::Hour1, &closes);

        assert!(!result.low_confidence);
        assert!(result.status.is_some());
        assert!(result.ma400.is_some());
        assert!(result.rsi_value.is_some());
    }

    #[test]
    fn test_golden_cross_overrides_table() {
        // Flat at 100, final bar jumps: SMA50 - SMA400 goes from 0 to > 0
        let closes = flat_then_last(410, 100.0, 200.0);
        let result = evaluate_closes(Timeframe::Hour4, &closes);

        assert_eq!(result.cross_signal, CrossSignal::Golden);
        assert_eq!(result.rsi_warning, RsiWarning::Overbought);
        assert_eq!(result.tone, Tone::Buy);
        assert_eq!(result.recommendation, "strong buy (golden cross)");
    }

    #[test]
    fn test_golden_cross_from_below_overrides_neutral_table() {
        // SMA50 sits under SMA400 until the final spike lifts it above
        let mut closes = vec![100.0; 210];
        closes.extend(vec![200.0; 150]);
        closes.extend(vec![130.0; 49]);
        closes.push(800.0);

        let sma50 = calculate_sma(&closes, SMA_SHORT_PERIOD);
        let sma400 = calculate_sma(&closes, SMA_LONG_PERIOD);
        let n = closes.len();
        assert!(sma50[n - 2] - sma400[n - 2] < 0.0);
        assert!(sma50[n - 1] - sma400[n - 1] > 0.0);

        let result = evaluate_closes(Timeframe::Day1, &closes);

        // Table alone: weak-down + overbought -> neutral "short-term sell"
        assert_eq!(result.status, Some(MarketStatus::WeakDown));
        assert_eq!(result.rsi_warning, RsiWarning::Overbought);
        assert_eq!(decide(MarketStatus::WeakDown, RsiWarning::Overbought).0, Tone::Neutral);

        assert_eq!(result.cross_signal, CrossSignal::Golden);
        assert_eq!(result.tone, Tone::Buy);
        assert_eq!(result.recommendation, "strong buy (golden cross)");
    }

    #[test]
    fn test_dead_cross_overrides_table() {
        // Table alone would say strong-down + oversold -> neutral "short-term buy"
        let closes = flat_then_last(410, 100.0, 10.0);
        let result = evaluate_closes(Timeframe::Day1, &closes);

        assert_eq!(result.status, Some(MarketStatus::StrongDown));
        assert_eq!(result.rsi_warning, RsiWarning::Oversold);
        assert_eq!(result.cross_signal, CrossSignal::Dead);
        assert_eq!(result.tone, Tone::Sell);
        assert_eq!(result.recommendation, "strong sell (dead cross)");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let closes = uptrend_closes(600);
        assert_eq!(
            evaluate_closes(Timeframe::Day1, &closes),
            evaluate_closes(Timeframe::Day1, &closes)
        );
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(3.0, 2.0, 1.0), MarketStatus::StrongUp);
        assert_eq!(classify_status(3.0, 1.0, 2.0), MarketStatus::WeakUp);
        assert_eq!(classify_status(1.0, 3.0, 2.0), MarketStatus::WeakDown);
        assert_eq!(classify_status(1.0, 2.0, 3.0), MarketStatus::StrongDown);
        // Ties fall through to strong-down
        assert_eq!(classify_status(2.0, 2.0, 2.0), MarketStatus::StrongDown);
    }

    #[test]
    fn test_classify_rsi_boundaries() {
        assert_eq!(classify_rsi(Some(70.0)), RsiWarning::Overbought);
        assert_eq!(classify_rsi(Some(69.9)), RsiWarning::Normal);
        assert_eq!(classify_rsi(Some(30.0)), RsiWarning::Oversold);
        assert_eq!(classify_rsi(Some(30.1)), RsiWarning::Normal);
        assert_eq!(classify_rsi(None), RsiWarning::Normal);
    }

    #[test]
    fn test_detect_cross() {
        assert_eq!(detect_cross(&[1.0, 3.0], &[1.0, 2.0]), CrossSignal::Golden);
        assert_eq!(detect_cross(&[2.0, 1.0], &[1.0, 2.0]), CrossSignal::Dead);
        // Strict sign flips
        assert_eq!(detect_cross(&[1.0, 3.0], &[2.0, 2.0]), CrossSignal::Golden);
        assert_eq!(detect_cross(&[3.0, 1.0], &[2.0, 2.0]), CrossSignal::Dead);
        assert_eq!(detect_cross(&[1.0, 1.5], &[2.0, 2.0]), CrossSignal::None);
        assert_eq!(detect_cross(&[2.0, 3.0], &[1.0, 2.0]), CrossSignal::None);
        assert_eq!(detect_cross(&[f64::NAN, 3.0], &[1.0, 2.0]), CrossSignal::None);
        assert_eq!(detect_cross(&[1.0], &[1.0]), CrossSignal::None);
    }

    #[test]
    fn test_decision_table_is_exhaustive() {
        let statuses = [
            MarketStatus::StrongDown,
            MarketStatus::WeakDown,
            MarketStatus::WeakUp,
            MarketStatus::StrongUp,
        ];
        let warnings = [RsiWarning::Overbought, RsiWarning::Oversold, RsiWarning::Normal];

        let expected = [
            [
                (Tone::Sell, "strong sell"),
                (Tone::Neutral, "short-term buy"),
                (Tone::Sell, "sell"),
            ],
            [
                (Tone::Neutral, "short-term sell"),
                (Tone::Neutral, "short-term buy"),
                (Tone::Neutral, "avoid"),
            ],
            [
                (Tone::Neutral, "short-term sell"),
                (Tone::Neutral, "short-term buy"),
                (Tone::Neutral, "avoid"),
            ],
            [
                (Tone::Buy, "buy with caution"),
                (Tone::Buy, "strong buy"),
                (Tone::Buy, "buy"),
            ],
        ];

        for (row, status) in statuses.iter().enumerate() {
            for (col, warning) in warnings.iter().enumerate() {
                assert_eq!(decide(*status, *warning), expected[row][col]);
            }
        }
    }
}
