//! Market signal core
//!
//! - [`models::indicators`]: SMA, EMA, RSI, MACD over closing prices
//! - [`services::failover`]: ordered provider failover with a minimum-length bar
//! - [`services::resampler`]: hourly to 4-hour downsampling
//! - [`services::evaluator`]: per-timeframe status, RSI warning, cross and tone
//! - [`services::consensus`]: majority vote across 1h / 4h / 1d

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use models::indicators::compute_indicators;
pub use services::{aggregate, evaluate_timeframe, FailoverFetcher};
