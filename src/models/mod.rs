mod fetch_config;
mod price;
mod signal;
mod timeframe;
pub mod indicators;

pub use fetch_config::{AssetConfig, FetchConfig, Resolution};
pub use indicators::{IndicatorSet, Macd};
pub use price::{PricePoint, PriceSeries};
pub use signal::{AggregateResult, CrossSignal, EvaluationResult, MarketStatus, RsiWarning, Tone};
pub use timeframe::Timeframe;
