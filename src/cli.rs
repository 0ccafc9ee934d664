use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::journal::TradeDraft;
use crate::models::{Category, Direction, TradeFilters};

#[derive(Parser)]
#[command(
    name = "finstride",
    version,
    about = "FinStride - portfolio tracker and trade journal"
)]
pub struct Cli {
    /// Data directory. Defaults to $FINSTRIDE_DATA_DIR, then the platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record, edit and move journal entries.
    Trades {
        #[command(subcommand)]
        action: TradesAction,
    },
    /// Aggregate performance of the journal.
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// P&L over time, per strategy, win/loss split and emotional state.
    Analysis {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Render a price chart as SVG.
    Chart {
        #[command(subcommand)]
        action: ChartAction,
    },
    /// Market quotes.
    Market {
        #[command(subcommand)]
        action: MarketAction,
    },
    /// Demo portfolio with holdings and recent activity.
    Portfolio,
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Check an account's credentials.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum TradesAction {
    /// List journal entries.
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Journal a new trade.
    Add {
        #[command(flatten)]
        trade: TradeArgs,
    },
    /// Replace an existing trade; unspecified fields keep their values.
    Edit {
        id: String,
        #[command(flatten)]
        trade: TradeArgs,
    },
    Delete {
        id: String,
    },
    /// Replace the journal with a JSON export.
    Import {
        file: PathBuf,
    },
    /// Write the journal as JSON.
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the journal as CSV.
    ExportCsv {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ChartAction {
    /// Closing prices from the stock's daily history.
    Stock {
        symbol: String,
        /// Generated demo series instead: 1D, 1W, 1M, 3M, 1Y or ALL.
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Cumulative net P&L of the journal.
    Equity {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MarketAction {
    /// NIFTY 50 and NIFTY BANK with change against previous close.
    Indices,
    /// Popular stocks.
    Popular,
    /// Quote and history for one symbol.
    Stock { symbol: String },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        chart_width: Option<u32>,
        #[arg(long)]
        chart_height: Option<u32>,
        #[arg(long)]
        seed_sample_trades: Option<bool>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// F&O, Equity or All.
    #[arg(long)]
    pub category: Option<String>,
    /// Strategy name or All.
    #[arg(long)]
    pub strategy: Option<String>,
}

impl FilterArgs {
    pub fn into_filters(self) -> Option<TradeFilters> {
        if self.category.is_none() && self.strategy.is_none() {
            return None;
        }
        Some(TradeFilters {
            category: self.category,
            strategy: self.strategy,
        })
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TradeArgs {
    /// YYYY-MM-DD; defaults to today for new trades.
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub entry_time: Option<String>,
    /// HH:MM
    #[arg(long)]
    pub exit_time: Option<String>,
    #[arg(long)]
    pub asset: Option<String>,
    /// Long or Short.
    #[arg(long = "type")]
    pub direction: Option<String>,
    #[arg(long)]
    pub quantity: Option<u32>,
    #[arg(long)]
    pub entry_price: Option<f64>,
    #[arg(long)]
    pub exit_price: Option<f64>,
    #[arg(long)]
    pub charges: Option<f64>,
    /// F&O or Equity. Changing it resets the strategy unless one is given.
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub strategy: Option<String>,
    #[arg(long)]
    pub entry_reason: Option<String>,
    #[arg(long)]
    pub exit_reason: Option<String>,
    /// 1 (panic) to 5 (overconfident).
    #[arg(long)]
    pub emotion: Option<u8>,
    #[arg(long)]
    pub lesson: Option<String>,
}

impl TradeArgs {
    /// Copies every given field onto the form. The category goes first so an
    /// explicit strategy survives the reset.
    pub fn apply(self, draft: &mut TradeDraft) -> Result<(), String> {
        if let Some(category) = self.category {
            let category = Category::parse(&category)
                .ok_or_else(|| format!("Unknown category '{}', expected F&O or Equity", category))?;
            draft.set_category(category);
        }
        if let Some(direction) = self.direction {
            draft.direction = Direction::parse(&direction)
                .ok_or_else(|| format!("Unknown trade type '{}', expected Long or Short", direction))?;
        }

        if let Some(v) = self.strategy {
            draft.strategy = v;
        }
        if let Some(v) = self.date {
            draft.date = v;
        }
        if let Some(v) = self.entry_time {
            draft.entry_time = v;
        }
        if let Some(v) = self.exit_time {
            draft.exit_time = v;
        }
        if let Some(v) = self.asset {
            draft.asset = v;
        }
        if self.quantity.is_some() {
            draft.quantity = self.quantity;
        }
        if self.entry_price.is_some() {
            draft.entry_price = self.entry_price;
        }
        if self.exit_price.is_some() {
            draft.exit_price = self.exit_price;
        }
        if self.charges.is_some() {
            draft.charges = self.charges;
        }
        if let Some(v) = self.entry_reason {
            draft.entry_reason = v;
        }
        if let Some(v) = self.exit_reason {
            draft.exit_reason = v;
        }
        if let Some(v) = self.emotion {
            draft.emotion = v;
        }
        if let Some(v) = self.lesson {
            draft.lesson = v;
        }
        Ok(())
    }
}
