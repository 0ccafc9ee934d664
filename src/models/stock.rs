use serde::{Deserialize, Serialize};

/// One point of a price series as consumed by the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, price: f64) -> Self {
        Self {
            date: date.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPricePoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&HistoricalPricePoint> for PricePoint {
    fn from(point: &HistoricalPricePoint) -> Self {
        PricePoint::new(point.date.clone(), point.close)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub market_cap: f64,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_data: Option<Vec<HistoricalPricePoint>>,
}

impl StockData {
    /// Chronological price series for charting. History arrives newest
    /// first, so it is reversed here.
    pub fn price_series(&self) -> Vec<PricePoint> {
        self.historical_data
            .as_deref()
            .unwrap_or_default()
            .iter()
            .rev()
            .map(PricePoint::from)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexData {
    pub name: String,
    pub current_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub previous_close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexQuotes {
    pub nifty: IndexData,
    pub bank_nifty: IndexData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub change: f64,
    pub percentage: f64,
    pub is_positive: bool,
}

/// Change relative to a reference price; percentage is 0 for a zero reference.
pub fn calculate_change(current: f64, reference: f64) -> PriceChange {
    let change = current - reference;
    let percentage = if reference == 0.0 {
        0.0
    } else {
        (change / reference) * 100.0
    };
    PriceChange {
        change,
        percentage,
        is_positive: change >= 0.0,
    }
}

impl IndexData {
    pub fn change(&self) -> PriceChange {
        calculate_change(self.current_price, self.previous_close)
    }
}

impl StockData {
    /// Quotes carry no previous close, so the day low stands in for it.
    pub fn approximate_change(&self) -> PriceChange {
        calculate_change(self.current_price, self.day_low)
    }
}

/// A mock portfolio position on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: u32,
    pub symbol: String,
    pub name: String,
    pub shares: u32,
    pub avg_price: f64,
    pub current_price: f64,
    pub change: f64,
}

impl Holding {
    pub fn market_value(&self) -> f64 {
        self.shares as f64 * self.current_price
    }

    pub fn gain_loss(&self) -> f64 {
        self.shares as f64 * (self.current_price - self.avg_price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub symbol: String,
    pub shares: u32,
    pub price: f64,
    pub date: String,
}

/// Detailed quote shown on a stock page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: String,
    pub market_cap: String,
    pub pe_ratio: f64,
    pub dividend: f64,
    pub year_high: f64,
    pub year_low: f64,
    pub shares: u32,
    pub avg_price: f64,
    pub total_value: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
}
