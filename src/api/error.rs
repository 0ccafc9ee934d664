use thiserror::Error;

/// Failures from the market-data layer.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch details for stock {symbol}: {reason}")]
    StockUnavailable { symbol: String, reason: String },

    #[error("Failed to load {0} data.")]
    FeedUnavailable(String),
}

impl ApiError {
    /// Static hint shown next to any market-data failure.
    pub const RETRY_HINT: &'static str = "Please try refreshing the page or check back later.";

    pub fn user_message(&self) -> String {
        format!("{} {}", self, Self::RETRY_HINT)
    }
}
