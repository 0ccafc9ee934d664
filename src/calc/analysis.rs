use crate::models::{PricePoint, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub strategy: String,
    pub trade_count: usize,
    pub net_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPerformance {
    pub emotion: u8,
    pub label: String,
    pub trade_count: usize,
    pub net_pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinLossDistribution {
    pub wins: usize,
    pub losses: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityCurvePoint {
    pub date: String,
    pub cumulative_pnl: f64,
    pub daily_pnl: f64,
    pub trade_count: i32,
}

pub fn emotion_label(emotion: u8) -> &'static str {
    match emotion {
        1 => "Panic",
        2 => "Anxious",
        3 => "Neutral",
        4 => "Confident",
        5 => "Overconfident",
        _ => "Unknown",
    }
}

/// Net P&L per trade in journal order.
pub fn pnl_over_time(trades: &[Trade]) -> Vec<PricePoint> {
    trades
        .iter()
        .map(|t| PricePoint::new(t.date.clone(), t.net_pnl))
        .collect()
}

/// Net P&L summed per strategy, best first.
pub fn strategy_performance(trades: &[Trade]) -> Vec<StrategyPerformance> {
    let mut by_strategy: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for trade in trades {
        let entry = by_strategy.entry(trade.strategy.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += trade.net_pnl;
    }

    let mut result: Vec<StrategyPerformance> = by_strategy
        .into_iter()
        .map(|(strategy, (trade_count, net_pnl))| StrategyPerformance {
            strategy: strategy.to_string(),
            trade_count,
            net_pnl,
        })
        .collect();
    result.sort_by(|a, b| b.net_pnl.total_cmp(&a.net_pnl));
    result
}

pub fn win_loss_distribution(trades: &[Trade]) -> WinLossDistribution {
    let wins = trades.iter().filter(|t| t.is_win()).count();
    WinLossDistribution {
        wins,
        losses: trades.len() - wins,
    }
}

/// One bucket per emotional state 1..=5, empty buckets included.
pub fn emotion_performance(trades: &[Trade]) -> Vec<EmotionPerformance> {
    (1..=5u8)
        .map(|emotion| {
            let bucket = trades.iter().filter(|t| t.emotion == emotion);
            let (trade_count, net_pnl) =
                bucket.fold((0, 0.0), |(count, sum), t| (count + 1, sum + t.net_pnl));
            EmotionPerformance {
                emotion,
                label: emotion_label(emotion).to_string(),
                trade_count,
                net_pnl,
            }
        })
        .collect()
}

/// Daily net P&L and its running total, sorted by date.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityCurvePoint> {
    let mut daily_map: BTreeMap<&str, (f64, i32)> = BTreeMap::new();
    for trade in trades {
        let entry = daily_map.entry(trade.date.as_str()).or_insert((0.0, 0));
        entry.0 += trade.net_pnl;
        entry.1 += 1;
    }

    let mut cumulative_pnl = 0.0;
    let mut result = Vec::with_capacity(daily_map.len());
    for (date, (daily_pnl, trade_count)) in daily_map {
        cumulative_pnl += daily_pnl;
        result.push(EquityCurvePoint {
            date: date.to_string(),
            cumulative_pnl,
            daily_pnl,
            trade_count,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_trades;

    #[test]
    fn test_equity_curve_sorts_by_date_and_accumulates() {
        let mut trades = sample_trades();
        let mut extra = trades[0].clone();
        extra.id = "3".to_string();
        extra.net_pnl = -40.0;
        trades.push(extra);

        let curve = equity_curve(&trades);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].date, "2024-03-14");
        assert_eq!(curve[0].cumulative_pnl, 100.0);
        assert_eq!(curve[1].date, "2024-03-15");
        assert_eq!(curve[1].daily_pnl, -40.0);
        assert_eq!(curve[1].trade_count, 2);
        assert_eq!(curve[1].cumulative_pnl, 60.0);
    }

    #[test]
    fn test_emotion_buckets_cover_full_scale() {
        let buckets = emotion_performance(&sample_trades());
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[1].label, "Anxious");
        assert_eq!(buckets[1].trade_count, 1);
        assert_eq!(buckets[1].net_pnl, 100.0);
        assert_eq!(buckets[0].trade_count, 0);
    }

    #[test]
    fn test_win_loss_counts_breakeven_as_loss() {
        let distribution = win_loss_distribution(&sample_trades());
        assert_eq!(distribution, WinLossDistribution { wins: 1, losses: 1 });
    }

    #[test]
    fn test_strategy_performance_orders_best_first() {
        let performance = strategy_performance(&sample_trades());
        assert_eq!(performance[0].strategy, "Price Action Option Buying");
        assert_eq!(performance[1].net_pnl, 0.0);
    }
}
