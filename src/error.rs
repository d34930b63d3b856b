use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single provider failed; the fetcher recovers by moving to the next one.
    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Every provider was exhausted (or the deadline expired) for one fetch cycle.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl AppError {
    /// True for the terminal fetch failure the UI renders as "data unavailable".
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, AppError::DataUnavailable(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_is_distinguishable() {
        let err = AppError::DataUnavailable("all providers exhausted".to_string());
        assert!(err.is_data_unavailable());
        assert_eq!(err.to_string(), "Data unavailable: all providers exhausted");

        let err = AppError::ProviderUnavailable {
            provider: "coingecko".to_string(),
            reason: "HTTP status 500".to_string(),
        };
        assert!(!err.is_data_unavailable());
        assert_eq!(err.to_string(), "Provider coingecko unavailable: HTTP status 500");
    }
}
