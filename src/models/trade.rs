use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "long" => Some(Direction::Long),
            "short" => Some(Direction::Short),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "F&O")]
    FuturesAndOptions,
    Equity,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::FuturesAndOptions, Category::Equity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FuturesAndOptions => "F&O",
            Category::Equity => "Equity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "F&O" | "FNO" | "fno" | "f&o" => Some(Category::FuturesAndOptions),
            "Equity" | "equity" | "EQUITY" => Some(Category::Equity),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A journaled trade. Field names on the wire match the browser storage
/// format so exported files from older versions import unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    pub date: String,
    pub entry_time: String,
    pub exit_time: String,
    pub asset: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub quantity: u32,
    pub entry_price: f64,
    pub exit_price: f64,
    pub charges: f64,
    #[serde(rename = "grossPnL")]
    pub gross_pnl: f64,
    #[serde(rename = "netPnL")]
    pub net_pnl: f64,
    pub strategy: String,
    pub category: Category,
    pub entry_reason: String,
    pub exit_reason: String,
    pub emotion: u8,
    pub lesson: String,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.net_pnl > 0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeFilters {
    pub category: Option<String>,
    pub strategy: Option<String>,
}

impl TradeFilters {
    pub fn matches(&self, trade: &Trade) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("All") => true,
            Some(category) => trade.category.as_str() == category,
        };
        let strategy_ok = match self.strategy.as_deref() {
            None | Some("All") => true,
            Some(strategy) => trade.strategy == strategy,
        };
        category_ok && strategy_ok
    }
}

/// Journal entries shown on first launch, before anything was saved.
pub fn sample_trades() -> Vec<Trade> {
    vec![
        Trade {
            id: "1".to_string(),
            date: "2024-03-15".to_string(),
            entry_time: "09:30".to_string(),
            exit_time: "10:15".to_string(),
            asset: "NIFTY".to_string(),
            direction: Direction::Long,
            quantity: 1,
            entry_price: 22500.0,
            exit_price: 22600.0,
            charges: 100.0,
            gross_pnl: 100.0,
            net_pnl: 0.0,
            strategy: "Futures using ST".to_string(),
            category: Category::FuturesAndOptions,
            entry_reason: "Price broke above resistance".to_string(),
            exit_reason: "Target achieved".to_string(),
            emotion: 4,
            lesson: "Stick to the plan".to_string(),
        },
        Trade {
            id: "2".to_string(),
            date: "2024-03-14".to_string(),
            entry_time: "10:45".to_string(),
            exit_time: "11:30".to_string(),
            asset: "BANKNIFTY".to_string(),
            direction: Direction::Short,
            quantity: 1,
            entry_price: 48000.0,
            exit_price: 47800.0,
            charges: 100.0,
            gross_pnl: 200.0,
            net_pnl: 100.0,
            strategy: "Price Action Option Buying".to_string(),
            category: Category::FuturesAndOptions,
            entry_reason: "Price hit resistance".to_string(),
            exit_reason: "Stop loss hit".to_string(),
            emotion: 2,
            lesson: "Need better stop loss placement".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_browser_export() {
        let json = r#"{
            "id": "1710490000000",
            "date": "2024-03-15",
            "entryTime": "09:30",
            "exitTime": "10:15",
            "asset": "NIFTY",
            "type": "Short",
            "quantity": 2,
            "entryPrice": 22500,
            "exitPrice": 22400,
            "charges": 50,
            "grossPnL": 200,
            "netPnL": 150,
            "strategy": "Iron Fly",
            "category": "F&O",
            "entryReason": "Rejection at VWAP",
            "exitReason": "Target",
            "emotion": 3,
            "lesson": "Patience"
        }"#;

        let trade: Trade = serde_json::from_str(json).expect("browser export should parse");
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.category, Category::FuturesAndOptions);
        assert_eq!(trade.quantity, 2);
        assert_eq!(trade.net_pnl, 150.0);
    }

    #[test]
    fn test_serializes_original_field_names() {
        let trade = sample_trades().remove(0);
        let value = serde_json::to_value(&trade).unwrap();

        assert_eq!(value["type"], "Long");
        assert_eq!(value["category"], "F&O");
        assert_eq!(value["grossPnL"], 100.0);
        assert_eq!(value["netPnL"], 0.0);
        assert!(value.get("entryTime").is_some());
        assert!(value.get("direction").is_none());
    }

    #[test]
    fn test_filters_treat_all_as_wildcard() {
        let trades = sample_trades();
        let filters = TradeFilters {
            category: Some("All".to_string()),
            strategy: Some("Iron Fly".to_string()),
        };
        assert!(trades.iter().all(|t| !filters.matches(t)));

        let filters = TradeFilters {
            category: Some("F&O".to_string()),
            strategy: None,
        };
        assert!(trades.iter().all(|t| filters.matches(t)));
    }

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!(Direction::parse("SHORT"), Some(Direction::Short));
        assert_eq!(Direction::parse(" long "), Some(Direction::Long));
        assert_eq!(Direction::parse("flat"), None);
    }
}
