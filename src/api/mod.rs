pub mod error;
pub mod portfolio;
pub mod stock;

pub use error::ApiError;
pub use portfolio::{
    chart_for_timeframe, company_name, generate_mock_chart_data, mock_activities, mock_holdings,
    mock_stock_quote, PortfolioSummary, Timeframe, Trend,
};
pub use stock::{market_overview, MarketOverview, MockStockProvider, StockProvider};
