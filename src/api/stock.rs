use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::models::{HistoricalPricePoint, IndexData, IndexQuotes, StockData};

/// Source of market quotes for the dashboard and stock pages.
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// NIFTY 50 and NIFTY BANK.
    async fn index_quotes(&self) -> Result<IndexQuotes, ApiError>;

    async fn popular_stocks(&self) -> Result<Vec<StockData>, ApiError>;

    /// Quote plus daily history, newest day first.
    async fn stock_details(&self, symbol: &str) -> Result<StockData, ApiError>;
}

/// Hard-coded quotes standing in for a real market-data feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStockProvider;

impl MockStockProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Symbol that makes the mock feed fail, for exercising error paths.
const FAILING_SYMBOL: &str = "error";

fn popular(symbol: &str, name: &str, price: f64, high: f64, low: f64, cap: f64, volume: u64) -> StockData {
    StockData {
        symbol: symbol.to_string(),
        name: name.to_string(),
        current_price: price,
        day_high: high,
        day_low: low,
        market_cap: cap,
        volume,
        historical_data: None,
    }
}

fn history_day(date: &str, open: f64, high: f64, low: f64, close: f64, volume: u64) -> HistoricalPricePoint {
    HistoricalPricePoint {
        date: date.to_string(),
        open,
        high,
        low,
        close,
        volume,
    }
}

#[async_trait]
impl StockProvider for MockStockProvider {
    async fn index_quotes(&self) -> Result<IndexQuotes, ApiError> {
        Ok(IndexQuotes {
            nifty: IndexData {
                name: "NIFTY 50".to_string(),
                current_price: 19000.50,
                day_high: 19050.75,
                day_low: 18950.25,
                previous_close: 18900.00,
            },
            bank_nifty: IndexData {
                name: "NIFTY BANK".to_string(),
                current_price: 43000.80,
                day_high: 43100.50,
                day_low: 42900.60,
                previous_close: 42800.00,
            },
        })
    }

    async fn popular_stocks(&self) -> Result<Vec<StockData>, ApiError> {
        Ok(vec![
            popular("RELIANCE", "Reliance Industries", 2500.00, 2510.50, 2490.75, 17e12, 5_000_000),
            popular("TCS", "Tata Consultancy Services", 3400.00, 3415.25, 3380.50, 12e12, 3_000_000),
            popular("HDFCBANK", "HDFC Bank", 1600.00, 1605.75, 1590.25, 9e12, 7_000_000),
        ])
    }

    async fn stock_details(&self, symbol: &str) -> Result<StockData, ApiError> {
        let symbol = symbol.trim();
        if symbol.eq_ignore_ascii_case(FAILING_SYMBOL) {
            log::warn!("Simulated upstream failure for symbol {}", symbol);
            return Err(ApiError::StockUnavailable {
                symbol: symbol.to_string(),
                reason: "upstream request failed".to_string(),
            });
        }

        let symbol = symbol.to_uppercase();
        Ok(StockData {
            name: format!("{} Industries Ltd.", symbol),
            symbol,
            current_price: 2500.00,
            day_high: 2510.50,
            day_low: 2490.75,
            market_cap: 17e12,
            volume: 5_000_000,
            historical_data: Some(vec![
                history_day("2023-10-25", 2490.00, 2510.50, 2485.25, 2500.00, 5_000_000),
                history_day("2023-10-24", 2480.00, 2495.75, 2475.50, 2490.00, 4_500_000),
            ]),
        })
    }
}

/// Everything the market overview needs, fetched concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOverview {
    pub indices: IndexQuotes,
    pub popular: Vec<StockData>,
}

pub async fn market_overview<S: StockProvider + ?Sized>(provider: &S) -> Result<MarketOverview, ApiError> {
    let (indices, popular) = futures::join!(provider.index_quotes(), provider.popular_stocks());
    let indices = indices.map_err(|e| {
        log::error!("Index quotes failed: {}", e);
        ApiError::FeedUnavailable("market".to_string())
    })?;
    let popular = popular.map_err(|e| {
        log::error!("Popular stocks failed: {}", e);
        ApiError::FeedUnavailable("market".to_string())
    })?;
    Ok(MarketOverview { indices, popular })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;

    #[tokio::test]
    async fn test_index_quotes() {
        let quotes = MockStockProvider::new().index_quotes().await.unwrap();
        assert_eq!(quotes.nifty.name, "NIFTY 50");
        assert_eq!(quotes.bank_nifty.previous_close, 42800.0);
        assert!(quotes.nifty.change().is_positive);
    }

    #[tokio::test]
    async fn test_popular_stocks_in_order() {
        let stocks = MockStockProvider::new().popular_stocks().await.unwrap();
        let symbols: Vec<&str> = stocks.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["RELIANCE", "TCS", "HDFCBANK"]);
        assert_eq!(stocks[1].volume, 3_000_000);
    }

    #[tokio::test]
    async fn test_stock_details_uppercases_symbol() {
        let stock = MockStockProvider::new().stock_details("infy").await.unwrap();
        assert_eq!(stock.symbol, "INFY");
        assert_eq!(stock.name, "INFY Industries Ltd.");
        assert_eq!(
            stock.price_series(),
            vec![PricePoint::new("2023-10-24", 2490.0), PricePoint::new("2023-10-25", 2500.0)]
        );
    }

    #[tokio::test]
    async fn test_error_symbol_fails_with_retry_hint() {
        let err = MockStockProvider::new().stock_details("ErRoR").await.unwrap_err();
        assert!(matches!(err, ApiError::StockUnavailable { .. }));
        assert!(err.user_message().ends_with(ApiError::RETRY_HINT));
    }

    #[tokio::test]
    async fn test_market_overview_joins_both_feeds() {
        let overview = market_overview(&MockStockProvider::new()).await.unwrap();
        assert_eq!(overview.popular.len(), 3);
        assert_eq!(overview.indices.bank_nifty.name, "NIFTY BANK");
    }
}
