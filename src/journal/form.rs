use crate::calc::{calculate_pnl, PnL};
use crate::error::AppError;
use crate::models::{Category, Direction, StrategyTaxonomy, Trade};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// In-progress state of the trade entry form.
///
/// Numeric fields stay optional until submission so a half-filled form can
/// still show a P&L preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDraft {
    pub date: String,
    pub entry_time: String,
    pub exit_time: String,
    pub asset: String,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub quantity: Option<u32>,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub charges: Option<f64>,
    pub strategy: String,
    pub category: Category,
    pub entry_reason: String,
    pub exit_reason: String,
    pub emotion: u8,
    pub lesson: String,
}

impl TradeDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            entry_time: String::new(),
            exit_time: String::new(),
            asset: String::new(),
            direction: Direction::Long,
            quantity: Some(1),
            entry_price: Some(0.0),
            exit_price: Some(0.0),
            charges: Some(0.0),
            strategy: StrategyTaxonomy::default_strategy(Category::FuturesAndOptions).to_string(),
            category: Category::FuturesAndOptions,
            entry_reason: String::new(),
            exit_reason: String::new(),
            emotion: 3,
            lesson: String::new(),
        }
    }

    /// Pre-fills the form for editing an existing trade.
    pub fn from_trade(trade: &Trade) -> Self {
        Self {
            date: trade.date.clone(),
            entry_time: trade.entry_time.clone(),
            exit_time: trade.exit_time.clone(),
            asset: trade.asset.clone(),
            direction: trade.direction,
            quantity: Some(trade.quantity),
            entry_price: Some(trade.entry_price),
            exit_price: Some(trade.exit_price),
            charges: Some(trade.charges),
            strategy: trade.strategy.clone(),
            category: trade.category,
            entry_reason: trade.entry_reason.clone(),
            exit_reason: trade.exit_reason.clone(),
            emotion: trade.emotion,
            lesson: trade.lesson.clone(),
        }
    }

    pub fn set_category(&mut self, category: Category) {
        StrategyTaxonomy::on_category_change(&mut self.category, &mut self.strategy, category);
    }

    pub fn preview_pnl(&self) -> PnL {
        calculate_pnl(
            self.direction,
            self.quantity,
            self.entry_price,
            self.exit_price,
            self.charges,
        )
    }

    fn validate(&self) -> Result<(u32, f64, f64, f64), AppError> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|_| invalid(format!("Date '{}' must be YYYY-MM-DD", self.date)))?;
        for (label, value) in [("Entry time", &self.entry_time), ("Exit time", &self.exit_time)] {
            NaiveTime::parse_from_str(value, TIME_FORMAT)
                .map_err(|_| invalid(format!("{} '{}' must be HH:MM", label, value)))?;
        }

        for (label, value) in [
            ("Asset", &self.asset),
            ("Entry reason", &self.entry_reason),
            ("Exit reason", &self.exit_reason),
            ("Lesson", &self.lesson),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{} is required", label)));
            }
        }

        let quantity = match self.quantity {
            Some(q) if q >= 1 => q,
            _ => return Err(invalid("Quantity must be at least 1")),
        };
        let entry_price = non_negative("Entry price", self.entry_price)?;
        let exit_price = non_negative("Exit price", self.exit_price)?;
        let charges = match self.charges {
            None => 0.0,
            Some(c) => non_negative("Charges", Some(c))?,
        };

        if !(1..=5).contains(&self.emotion) {
            return Err(invalid("Emotion must be between 1 and 5"));
        }
        if !StrategyTaxonomy::contains(self.category, &self.strategy) {
            return Err(invalid(format!(
                "Strategy '{}' does not belong to {}",
                self.strategy, self.category
            )));
        }

        Ok((quantity, entry_price, exit_price, charges))
    }

    /// Validates the form and builds the trade it describes. New trades get
    /// a fresh id; edits keep `existing_id`. P&L is always derived here.
    pub fn submit(&self, existing_id: Option<&str>) -> Result<Trade, AppError> {
        let (quantity, entry_price, exit_price, charges) = self.validate()?;
        let pnl = self.preview_pnl();

        let id = match existing_id {
            Some(id) => id.to_string(),
            None => format!(
                "TRADE-{}-{}",
                Utc::now().timestamp_millis(),
                uuid::Uuid::new_v4()
            ),
        };

        Ok(Trade {
            id,
            date: self.date.clone(),
            entry_time: self.entry_time.clone(),
            exit_time: self.exit_time.clone(),
            asset: self.asset.trim().to_string(),
            direction: self.direction,
            quantity,
            entry_price,
            exit_price,
            charges,
            gross_pnl: pnl.gross_pnl,
            net_pnl: pnl.net_pnl,
            strategy: self.strategy.clone(),
            category: self.category,
            entry_reason: self.entry_reason.clone(),
            exit_reason: self.exit_reason.clone(),
            emotion: self.emotion,
            lesson: self.lesson.clone(),
        })
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

fn non_negative(label: &str, value: Option<f64>) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Some(_) => Err(invalid(format!("{} cannot be negative", label))),
        None => Err(invalid(format!("{} is required", label))),
    }
}
