//! Signal Constants
//!
//! Indicator periods, classification thresholds and fetch limits shared by
//! the indicator library, the evaluator and the failover fetcher.
//!
//! ## Moving average triple
//!
//! The evaluator classifies trend from three simple moving averages
//! (50 / 200 / 400). The 400 period is the longest window and therefore
//! decides how much history a timeframe needs before it can be evaluated.

/// Short moving average period
pub const SMA_SHORT_PERIOD: usize = 50;

/// Medium moving average period
pub const SMA_MEDIUM_PERIOD: usize = 200;

/// Long moving average period
pub const SMA_LONG_PERIOD: usize = 400;

/// RSI lookback (Wilder)
pub const RSI_PERIOD: usize = 14;

/// RSI at or above this value is overbought
pub const RSI_OVERBOUGHT: f64 = 70.0;

/// RSI at or below this value is oversold
pub const RSI_OVERSOLD: f64 = 30.0;

/// Floor for the RSI average loss so a loss-free window never divides by zero
pub const RSI_LOSS_EPSILON: f64 = 1e-10;

/// MACD fast EMA period
pub const MACD_FAST_PERIOD: usize = 12;

/// MACD slow EMA period
pub const MACD_SLOW_PERIOD: usize = 26;

/// MACD signal line EMA period
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// Minimum number of closes the evaluator needs.
///
/// SMA(400) plus a margin so the last two indices used for cross detection
/// are both defined.
pub const MIN_EVALUATION_POINTS: usize = 410;

/// Minimum number of normalized points for a provider result to be accepted
pub const MIN_ACCEPTED_POINTS: usize = 10;

/// Hourly candles per 4-hour bucket
pub const FOUR_HOUR_BUCKET_SIZE: usize = 4;

/// Recommendation used when a timeframe lacks history
pub const INSUFFICIENT_DATA_RECOMMENDATION: &str = "insufficient data — hold";
