use serde::{Deserialize, Serialize};
use std::fmt;

use super::Timeframe;

/// Actionable direction of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Buy,
    Neutral,
    Sell,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Buy => "buy",
            Tone::Neutral => "neutral",
            Tone::Sell => "sell",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend classification from the final SMA(50/200/400) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketStatus {
    StrongUp,
    WeakUp,
    WeakDown,
    StrongDown,
}

impl MarketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketStatus::StrongUp => "strong-up",
            MarketStatus::WeakUp => "weak-up",
            MarketStatus::WeakDown => "weak-down",
            MarketStatus::StrongDown => "strong-down",
        }
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RSI extremity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RsiWarning {
    Overbought,
    Oversold,
    Normal,
}

impl RsiWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsiWarning::Overbought => "overbought",
            RsiWarning::Oversold => "oversold",
            RsiWarning::Normal => "normal",
        }
    }
}

impl fmt::Display for RsiWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SMA(50) crossing SMA(400) on the last bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossSignal {
    Golden,
    Dead,
    None,
}

impl CrossSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrossSignal::Golden => "golden",
            CrossSignal::Dead => "dead",
            CrossSignal::None => "none",
        }
    }
}

impl fmt::Display for CrossSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal for one timeframe, produced fresh per fetch cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub timeframe: Timeframe,
    pub tone: Tone,

    /// None when the series was too short to classify
    pub status: Option<MarketStatus>,

    pub rsi_value: Option<f64>,
    pub rsi_warning: RsiWarning,
    pub cross_signal: CrossSignal,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub ma400: Option<f64>,

    /// Last close in the series
    ///
    /// Set even when `low_confidence` is true; only `None` for an empty series.
    pub price: Option<f64>,

    pub recommendation: String,

    /// Set on the insufficient-history result
    pub low_confidence: bool,
}

/// Master signal across three timeframes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub tone: Tone,
    pub label: String,
}
