use chrono::Utc;

use crate::api::{
    chart_for_timeframe, market_overview, mock_stock_quote, MarketOverview, PortfolioSummary,
    StockProvider, Timeframe,
};
use crate::chart::{render_price_chart, SvgCanvas};
use crate::commands::settings::get_settings;
use crate::commands::trades::get_trades;
use crate::db::Database;
use crate::models::{IndexData, PriceChange, PricePoint, StockData, StockQuote, TradeFilters};

/// Failures are reported with the retry hint the market pages show.
pub async fn get_market_overview(provider: &dyn StockProvider) -> Result<MarketOverview, String> {
    market_overview(provider).await.map_err(|e| e.user_message())
}

pub async fn get_index_quotes(provider: &dyn StockProvider) -> Result<Vec<(IndexData, PriceChange)>, String> {
    let quotes = provider.index_quotes().await.map_err(|e| e.user_message())?;
    Ok([quotes.nifty, quotes.bank_nifty]
        .into_iter()
        .map(|index| {
            let change = index.change();
            (index, change)
        })
        .collect())
}

pub async fn get_stock_details(provider: &dyn StockProvider, symbol: &str) -> Result<StockData, String> {
    provider
        .stock_details(symbol)
        .await
        .map_err(|e| e.user_message())
}

pub fn get_portfolio() -> PortfolioSummary {
    PortfolioSummary::mock()
}

pub fn get_stock_quote(symbol: &str) -> StockQuote {
    mock_stock_quote(&symbol.to_uppercase())
}

fn render_svg(points: &[PricePoint], is_positive: bool, width: u32, height: u32) -> String {
    let mut canvas = SvgCanvas::new(width, height);
    render_price_chart(&mut canvas, points, is_positive);
    canvas.to_svg()
}

/// Closing-price chart for a symbol from its daily history. Colour follows
/// the day's approximate change.
pub async fn render_stock_chart(
    db: &Database,
    provider: &dyn StockProvider,
    symbol: &str,
) -> Result<String, String> {
    let settings = get_settings(db)?;
    let stock = get_stock_details(provider, symbol).await?;
    let is_positive = stock.approximate_change().is_positive;
    Ok(render_svg(
        &stock.price_series(),
        is_positive,
        settings.chart_width,
        settings.chart_height,
    ))
}

/// Generated demo series for the stock page's timeframe selector.
pub fn render_timeframe_chart(db: &Database, symbol: &str, timeframe: Timeframe) -> Result<String, String> {
    let settings = get_settings(db)?;
    let quote = get_stock_quote(symbol);
    let points = chart_for_timeframe(timeframe, Utc::now().date_naive(), &mut rand::thread_rng());
    Ok(render_svg(
        &points,
        quote.change >= 0.0,
        settings.chart_width,
        settings.chart_height,
    ))
}

/// Cumulative net P&L by trade date.
pub fn render_equity_chart(db: &Database, filters: Option<TradeFilters>) -> Result<String, String> {
    let settings = get_settings(db)?;
    let trades = get_trades(db, filters)?;
    let points: Vec<PricePoint> = crate::calc::equity_curve(&trades)
        .into_iter()
        .map(|p| PricePoint::new(p.date, p.cumulative_pnl))
        .collect();
    let is_positive = points.last().is_none_or(|p| p.price >= 0.0);

    Ok(render_svg(
        &points,
        is_positive,
        settings.chart_width,
        settings.chart_height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStockProvider;

    #[tokio::test]
    async fn test_index_changes_against_previous_close() {
        let indices = get_index_quotes(&MockStockProvider::new()).await.unwrap();
        assert_eq!(indices.len(), 2);
        assert!((indices[1].1.change - 200.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_failed_lookup_carries_retry_hint() {
        let err = get_stock_details(&MockStockProvider::new(), "error").await.unwrap_err();
        assert!(err.ends_with("Please try refreshing the page or check back later."));
    }

    #[tokio::test]
    async fn test_stock_chart_uses_settings_size() {
        let db = Database::open_in_memory().unwrap();
        let svg = render_stock_chart(&db, &MockStockProvider::new(), "reliance").await.unwrap();
        assert!(svg.contains(r#"width="800" height="200""#));
        assert!(svg.contains(">$2500.00</text>"));
        assert!(svg.contains(">2023-10-24</text>"));
    }

    #[test]
    fn test_quote_symbol_is_uppercased() {
        assert_eq!(get_stock_quote("msft").name, "Microsoft Corporation");
    }

    #[test]
    fn test_equity_chart_over_sample_trades() {
        let db = Database::open_in_memory().unwrap();
        let svg = render_equity_chart(&db, None).unwrap();
        assert!(svg.contains(">2024-03-14</text>"));
        assert!(svg.contains(">2024-03-15</text>"));
    }

    #[test]
    fn test_timeframe_chart_renders() {
        let db = Database::open_in_memory().unwrap();
        let svg = render_timeframe_chart(&db, "AAPL", Timeframe::OneWeek).unwrap();
        assert!(svg.contains("<path"));
    }
}
