use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling granularity of an evaluated series
///
/// Ordered from shortest to longest horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1-hour candles
    #[serde(rename = "1h")]
    Hour1,
    /// 4-hour candles (resampled from 1h)
    #[serde(rename = "4h")]
    Hour4,
    /// Daily candles
    #[serde(rename = "1d")]
    Day1,
}

impl Timeframe {
    /// Convert to interval string representation
    pub fn to_interval_string(&self) -> &'static str {
        match self {
            Timeframe::Hour1 => "1h",
            Timeframe::Hour4 => "4h",
            Timeframe::Day1 => "1d",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "1h" | "hourly" => Ok(Timeframe::Hour1),
            "4h" => Ok(Timeframe::Hour4),
            "1d" | "daily" => Ok(Timeframe::Day1),
            _ => Err(format!("Invalid timeframe: {}. Valid options: 1h, 4h, 1d", s)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_interval_string())
    }
}
