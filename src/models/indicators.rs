//! Technical indicators over closing-price sequences
//!
//! # Undefined values
//! Every function returns a vector with the **same length** as its input.
//! Positions where the lookback window is not yet populated hold `f64::NAN`;
//! use [`last_defined`] or `f64::is_nan` to skip them.
//!
//! All functions are total: insufficient history never fails, it only
//! produces more `NaN` markers.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MACD_FAST_PERIOD, MACD_SIGNAL_PERIOD, MACD_SLOW_PERIOD, RSI_LOSS_EPSILON, RSI_PERIOD,
    SMA_LONG_PERIOD, SMA_MEDIUM_PERIOD, SMA_SHORT_PERIOD,
};
use crate::models::PriceSeries;

/// Calculate Simple Moving Average for a given period
///
/// # Arguments
/// * `closes` - Slice of closing prices
/// * `period` - Period for the moving average (e.g., 50, 200, 400)
///
/// # Returns
/// * Vector of MA values (the first `period - 1` values are NaN)
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    let mut ma_values = vec![f64::NAN; closes.len()];

    if period == 0 || closes.len() < period {
        return ma_values;
    }

    for i in (period - 1)..closes.len() {
        let start_idx = i + 1 - period;
        let sum: f64 = closes[start_idx..=i].iter().sum();
        ma_values[i] = sum / period as f64;
    }

    ma_values
}

/// Calculate Exponential Moving Average
///
/// Seeded with the first value, then `ema[i] = (x[i] - ema[i-1]) * k + ema[i-1]`
/// with `k = 2 / (period + 1)`. Defined at every index of a non-empty input.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut ema_values = Vec::with_capacity(values.len());

    let Some(&seed) = values.first() else {
        return ema_values;
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    ema_values.push(prev);

    for &value in &values[1..] {
        prev = (value - prev) * k + prev;
        ema_values.push(prev);
    }

    ema_values
}

/// Calculate Relative Strength Index with Wilder's smoothing
///
/// # Arguments
/// * `closes` - Slice of closing prices
/// * `period` - RSI lookback (14 by convention)
///
/// # Returns
/// * Vector of RSI values in `[0, 100]`; indices `< period` are NaN
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut rsi_values = vec![f64::NAN; closes.len()];

    if period == 0 || closes.len() <= period {
        return rsi_values;
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        gain_sum += change.max(0.0);
        loss_sum += (-change).max(0.0);
    }

    let period_f = period as f64;
    let mut avg_gain = gain_sum / period_f;
    let mut avg_loss = loss_sum / period_f;
    rsi_values[period] = rsi_from_averages(avg_gain, avg_loss);

    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        avg_gain = (avg_gain * (period_f - 1.0) + change.max(0.0)) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + (-change).max(0.0)) / period_f;
        rsi_values[i] = rsi_from_averages(avg_gain, avg_loss);
    }

    rsi_values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = avg_gain / avg_loss.max(RSI_LOSS_EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}

/// MACD line, signal line and histogram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate MACD
///
/// `line = EMA(fast) - EMA(slow)`, `signal = EMA(signal_period)` of the line,
/// `histogram = line - signal`.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal = calculate_ema(&line, signal_period);

    let histogram = line
        .iter()
        .zip(signal.iter())
        .map(|(l, s)| l - s)
        .collect();

    Macd {
        line,
        signal,
        histogram,
    }
}

/// Full indicator set exposed to the UI layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma50: Vec<f64>,
    pub sma200: Vec<f64>,
    pub sma400: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: Macd,
}

/// Compute SMA(50/200/400), RSI(14) and MACD(12, 26, 9) for a series
pub fn compute_indicators(series: &PriceSeries) -> IndicatorSet {
    let closes = series.closes();

    IndicatorSet {
        sma50: calculate_sma(&closes, SMA_SHORT_PERIOD),
        sma200: calculate_sma(&closes, SMA_MEDIUM_PERIOD),
        sma400: calculate_sma(&closes, SMA_LONG_PERIOD),
        rsi: calculate_rsi(&closes, RSI_PERIOD),
        macd: calculate_macd(&closes, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD),
    }
}

/// Last value of an indicator vector, or None if it is undefined
pub fn last_defined(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| !v.is_nan())
}
