pub mod coinbase;
pub mod coingecko;
pub mod consensus;
pub mod crypto_compare;
pub mod dashboard;
pub mod evaluator;
pub mod failover;
pub mod fear_greed;
pub mod resampler;
pub mod series_source;

pub use coinbase::CoinbaseSource;
pub use coingecko::CoinGeckoSource;
pub use consensus::aggregate;
pub use crypto_compare::CryptoCompareSource;
pub use dashboard::{
    build_dashboard, build_signal_report, evaluate_report, DashboardSnapshot, SignalReport,
};
pub use evaluator::evaluate_timeframe;
pub use failover::FailoverFetcher;
pub use fear_greed::{FearGreedClient, FearGreedReading};
pub use resampler::Resampler;
pub use series_source::{SeriesSource, SourceError};
