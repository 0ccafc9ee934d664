use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Activity, Holding, PricePoint, StockQuote};

fn holding(id: u32, symbol: &str, shares: u32, avg_price: f64, current_price: f64, change: f64) -> Holding {
    Holding {
        id,
        symbol: symbol.to_string(),
        name: company_name(symbol).to_string(),
        shares,
        avg_price,
        current_price,
        change,
    }
}

/// The demo account's positions.
pub fn mock_holdings() -> Vec<Holding> {
    vec![
        holding(1, "AAPL", 10, 150.75, 172.40, 1.24),
        holding(2, "MSFT", 5, 220.50, 237.95, -0.67),
        holding(3, "GOOGL", 2, 2100.25, 2250.80, 2.15),
        holding(4, "AMZN", 3, 3100.75, 3050.25, -1.05),
        holding(5, "TSLA", 8, 650.30, 710.25, 3.45),
    ]
}

pub fn mock_activities() -> Vec<Activity> {
    [
        (1, "BUY", "AAPL", 2, 169.75, "2023-05-20"),
        (2, "SELL", "MSFT", 1, 240.80, "2023-05-18"),
        (3, "BUY", "TSLA", 3, 695.20, "2023-05-15"),
    ]
    .into_iter()
    .map(|(id, kind, symbol, shares, price, date)| Activity {
        id,
        kind: kind.to_string(),
        symbol: symbol.to_string(),
        shares,
        price,
        date: date.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holdings: Vec<Holding>,
    pub total_value: f64,
    pub total_gain_loss: f64,
    pub recent_activity: Vec<Activity>,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: Vec<Holding>, recent_activity: Vec<Activity>) -> Self {
        let total_value = holdings.iter().map(Holding::market_value).sum();
        let total_gain_loss = holdings.iter().map(Holding::gain_loss).sum();
        Self {
            holdings,
            total_value,
            total_gain_loss,
            recent_activity,
        }
    }

    pub fn mock() -> Self {
        Self::from_holdings(mock_holdings(), mock_activities())
    }
}

pub fn company_name(symbol: &str) -> &'static str {
    match symbol {
        "AAPL" => "Apple Inc.",
        "MSFT" => "Microsoft Corporation",
        "GOOGL" => "Alphabet Inc.",
        "AMZN" => "Amazon.com, Inc.",
        "TSLA" => "Tesla, Inc.",
        "META" => "Meta Platforms, Inc.",
        "NFLX" => "Netflix, Inc.",
        _ => "Unknown Company",
    }
}

/// Detail quote for the stock page. Only the company name depends on the
/// symbol; the figures are the same demo position for every stock.
pub fn mock_stock_quote(symbol: &str) -> StockQuote {
    let current_price = 172.40;
    let shares = 15;
    let avg_price = 155.25;

    StockQuote {
        symbol: symbol.to_string(),
        name: company_name(symbol).to_string(),
        current_price,
        change: 1.24,
        change_percent: 0.72,
        open: 170.25,
        high: 173.50,
        low: 169.75,
        volume: "65.3M".to_string(),
        market_cap: "2.7T".to_string(),
        pe_ratio: 28.5,
        dividend: 0.92,
        year_high: 198.23,
        year_low: 142.18,
        shares,
        avg_price,
        total_value: 2586.00,
        total_gain: current_price * shares as f64 - avg_price * shares as f64,
        total_gain_percent: (current_price - avg_price) / avg_price * 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Volatile,
}

impl Trend {
    fn start_price(self) -> f64 {
        match self {
            Trend::Up => 150.0,
            Trend::Down => 190.0,
            Trend::Volatile => 170.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    OneMonth,
    OneDay,
    OneWeek,
    ThreeMonths,
    OneYear,
    All,
}

impl Timeframe {
    pub fn days(self) -> i64 {
        match self {
            Timeframe::OneDay => 1,
            Timeframe::OneWeek => 7,
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 90,
            Timeframe::OneYear => 365,
            Timeframe::All => 1095,
        }
    }

    pub fn trend(self) -> Trend {
        match self {
            Timeframe::OneDay | Timeframe::ThreeMonths => Trend::Volatile,
            _ => Trend::Up,
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1D" => Ok(Timeframe::OneDay),
            "1W" => Ok(Timeframe::OneWeek),
            "1M" => Ok(Timeframe::OneMonth),
            "3M" => Ok(Timeframe::ThreeMonths),
            "1Y" => Ok(Timeframe::OneYear),
            "ALL" => Ok(Timeframe::All),
            other => Err(format!("Unknown timeframe '{}', expected 1D, 1W, 1M, 3M, 1Y or ALL", other)),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
            Timeframe::All => "ALL",
        };
        f.write_str(label)
    }
}

const PRICE_FLOOR: f64 = 50.0;

/// Random walk ending on `today`, one point per day plus today itself.
pub fn generate_mock_chart_data<R: Rng>(
    days: i64,
    trend: Trend,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    let mut price = trend.start_price();
    let mut data = Vec::with_capacity(days.max(0) as usize + 1);

    for i in (0..=days).rev() {
        let date = today - Duration::days(i);
        let step: f64 = rng.gen_range(0.0..1.0);
        match trend {
            Trend::Up => price += step * 4.0 - 1.0,
            Trend::Down => price -= step * 4.0 - 1.0,
            Trend::Volatile => price += step * 6.0 - 3.0,
        }
        price = price.max(PRICE_FLOOR);

        data.push(PricePoint::new(
            date.format("%-m/%-d").to_string(),
            (price * 100.0).round() / 100.0,
        ));
    }

    data
}

pub fn chart_for_timeframe<R: Rng>(
    timeframe: Timeframe,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    generate_mock_chart_data(timeframe.days(), timeframe.trend(), today, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_portfolio_totals() {
        let summary = PortfolioSummary::mock();
        assert_eq!(summary.holdings.len(), 5);
        assert_eq!(summary.recent_activity[1].kind, "SELL");

        let expected_value = 10.0 * 172.40 + 5.0 * 237.95 + 2.0 * 2250.80 + 3.0 * 3050.25 + 8.0 * 710.25;
        assert!((summary.total_value - expected_value).abs() < 1e-6);
        let amzn = &summary.holdings[3];
        assert!(amzn.gain_loss() < 0.0);
    }

    #[test]
    fn test_quote_for_unknown_symbol() {
        let quote = mock_stock_quote("ZZZZ");
        assert_eq!(quote.name, "Unknown Company");
        assert!((quote.total_gain - 257.25).abs() < 1e-6);
        assert!((quote.total_gain_percent - 11.0466).abs() < 1e-3);
    }

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!("3m".parse::<Timeframe>(), Ok(Timeframe::ThreeMonths));
        assert_eq!("ALL".parse::<Timeframe>().map(Timeframe::days), Ok(1095));
        assert!("2W".parse::<Timeframe>().is_err());
        assert_eq!(Timeframe::default().to_string(), "1M");
    }

    #[test]
    fn test_chart_data_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let data = chart_for_timeframe(Timeframe::OneWeek, today, &mut rng);

        assert_eq!(data.len(), 8);
        assert_eq!(data[0].date, "3/8");
        assert_eq!(data[7].date, "3/15");
        for point in &data {
            assert_eq!((point.price * 100.0).round() / 100.0, point.price);
        }
        // Each up step moves between -1 and +3.
        assert!(data[0].price >= 149.0 && data[0].price <= 153.0);
    }

    #[test]
    fn test_chart_data_never_drops_below_floor() {
        let mut rng = StdRng::seed_from_u64(42);
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let data = generate_mock_chart_data(2000, Trend::Down, today, &mut rng);
        assert_eq!(data.len(), 2001);
        assert!(data.iter().all(|p| p.price >= PRICE_FLOOR));
    }
}
