use crate::models::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_pnl: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub risk_reward_ratio: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

impl TradeMetrics {
    pub fn losing_trades(&self) -> usize {
        self.total_trades - self.winning_trades
    }
}

/// Ratio with an explicit zero for a zero denominator.
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Aggregate journal statistics. Returns `None` for an empty journal.
///
/// Trades split into winners (`net_pnl > 0`) and everything else, so
/// breakeven trades land in the losing bucket and dilute `avg_loss`.
pub fn calculate_metrics(trades: &[Trade]) -> Option<TradeMetrics> {
    if trades.is_empty() {
        return None;
    }

    let total_trades = trades.len();
    let total_pnl: f64 = trades.iter().map(|t| t.net_pnl).sum();

    let winners: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_win())
        .map(|t| t.net_pnl)
        .collect();
    let winning_trades = winners.len();
    let non_winning_trades = total_trades - winning_trades;

    let win_rate = ratio_or_zero(winning_trades as f64, total_trades as f64) * 100.0;
    let avg_win = ratio_or_zero(winners.iter().sum(), winning_trades as f64);

    let loss_sum: f64 = trades
        .iter()
        .filter(|t| t.net_pnl < 0.0)
        .map(|t| t.net_pnl)
        .sum();
    let avg_loss = ratio_or_zero(loss_sum, non_winning_trades as f64);

    let risk_reward_ratio = ratio_or_zero(avg_win, avg_loss).abs();

    let best_trade = trades
        .iter()
        .map(|t| t.net_pnl)
        .fold(f64::NEG_INFINITY, f64::max);
    let worst_trade = trades
        .iter()
        .map(|t| t.net_pnl)
        .fold(f64::INFINITY, f64::min);

    Some(TradeMetrics {
        total_pnl,
        total_trades,
        winning_trades,
        win_rate,
        avg_win,
        avg_loss,
        risk_reward_ratio,
        best_trade,
        worst_trade,
    })
}
