use crate::calc::{
    calculate_metrics, emotion_performance, equity_curve, pnl_over_time, strategy_performance,
    win_loss_distribution, EmotionPerformance, EquityCurvePoint, StrategyPerformance, TradeMetrics,
    WinLossDistribution,
};
use crate::commands::settings::get_settings;
use crate::commands::trades::get_trades;
use crate::db::Database;
use crate::models::{PricePoint, TradeFilters};
use serde::{Deserialize, Serialize};

/// Headline numbers for the journal page. `metrics` is `None` when there is
/// nothing to aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub metrics: Option<TradeMetrics>,
    pub losing_trades: usize,
    pub currency: String,
}

/// Amount with the configured currency symbol, sign first: `-₹810.00`.
pub fn format_money(currency: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency, -amount)
    } else {
        format!("{}{:.2}", currency, amount)
    }
}

impl DashboardStats {
    /// Plain-text report for the terminal, `None` when there are no trades.
    pub fn summary(&self) -> Option<String> {
        let m = self.metrics.as_ref()?;
        let money = |amount: f64| format_money(&self.currency, amount);

        Some(format!(
            "Total P&L:     {}\n\
             Trades:        {} ({} won, {} not won)\n\
             Win rate:      {:.2}%\n\
             Average win:   {}\n\
             Average loss:  {}\n\
             Risk/reward:   {:.2}\n\
             Best trade:    {}\n\
             Worst trade:   {}",
            money(m.total_pnl),
            m.total_trades,
            m.winning_trades,
            self.losing_trades,
            m.win_rate,
            money(m.avg_win),
            money(m.avg_loss),
            m.risk_reward_ratio,
            money(m.best_trade),
            money(m.worst_trade),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub pnl_over_time: Vec<PricePoint>,
    pub strategy_performance: Vec<StrategyPerformance>,
    pub win_loss: WinLossDistribution,
    pub emotion_performance: Vec<EmotionPerformance>,
}

pub fn get_dashboard_stats(
    db: &Database,
    filters: Option<TradeFilters>,
) -> Result<DashboardStats, String> {
    let currency = get_settings(db)?.currency;
    let trades = get_trades(db, filters)?;
    let metrics = calculate_metrics(&trades);
    let losing_trades = metrics.as_ref().map_or(0, TradeMetrics::losing_trades);

    Ok(DashboardStats {
        metrics,
        losing_trades,
        currency,
    })
}

pub fn get_analysis(db: &Database, filters: Option<TradeFilters>) -> Result<AnalysisReport, String> {
    let trades = get_trades(db, filters)?;

    Ok(AnalysisReport {
        pnl_over_time: pnl_over_time(&trades),
        strategy_performance: strategy_performance(&trades),
        win_loss: win_loss_distribution(&trades),
        emotion_performance: emotion_performance(&trades),
    })
}

pub fn get_equity_curve(
    db: &Database,
    filters: Option<TradeFilters>,
) -> Result<Vec<EquityCurvePoint>, String> {
    let trades = get_trades(db, filters)?;
    Ok(equity_curve(&trades))
}
