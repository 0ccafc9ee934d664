use crate::models::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PnL {
    pub gross_pnl: f64,
    pub net_pnl: f64,
}

/// Gross and net P&L for a single trade.
///
/// Quantity, entry price and exit price must all be present and non-zero,
/// otherwise the zero pair is returned. Missing charges count as zero.
pub fn calculate_pnl(
    direction: Direction,
    quantity: Option<u32>,
    entry_price: Option<f64>,
    exit_price: Option<f64>,
    charges: Option<f64>,
) -> PnL {
    let (quantity, entry_price, exit_price) = match (quantity, entry_price, exit_price) {
        (Some(q), Some(entry), Some(exit)) if q != 0 && entry != 0.0 && exit != 0.0 => {
            (q as f64, entry, exit)
        }
        _ => return PnL::default(),
    };

    let gross_pnl = match direction {
        Direction::Long => (exit_price - entry_price) * quantity,
        Direction::Short => (entry_price - exit_price) * quantity,
    };
    let net_pnl = gross_pnl - charges.unwrap_or(0.0);

    PnL { gross_pnl, net_pnl }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_trade_with_charges() {
        let pnl = calculate_pnl(Direction::Long, Some(1), Some(22500.0), Some(22600.0), Some(100.0));
        assert_eq!(pnl.gross_pnl, 100.0);
        assert_eq!(pnl.net_pnl, 0.0);
    }

    #[test]
    fn test_short_trade_profits_when_price_falls() {
        let pnl = calculate_pnl(Direction::Short, Some(3), Some(48000.0), Some(47800.0), Some(100.0));
        assert_eq!(pnl.gross_pnl, 600.0);
        assert_eq!(pnl.net_pnl, 500.0);
    }

    #[test]
    fn test_losing_long_trade() {
        let pnl = calculate_pnl(Direction::Long, Some(10), Some(105.5), Some(100.0), Some(20.0));
        assert!((pnl.gross_pnl + 55.0).abs() < 1e-9);
        assert!((pnl.net_pnl + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_or_zero_inputs_yield_zero_pair() {
        let zero = PnL::default();
        assert_eq!(calculate_pnl(Direction::Long, None, Some(1.0), Some(2.0), None), zero);
        assert_eq!(calculate_pnl(Direction::Long, Some(0), Some(1.0), Some(2.0), None), zero);
        assert_eq!(calculate_pnl(Direction::Short, Some(1), Some(0.0), Some(2.0), None), zero);
        assert_eq!(calculate_pnl(Direction::Short, Some(1), Some(1.0), None, Some(5.0)), zero);
    }

    #[test]
    fn test_missing_charges_count_as_zero() {
        let pnl = calculate_pnl(Direction::Long, Some(2), Some(10.0), Some(15.0), None);
        assert_eq!(pnl.gross_pnl, pnl.net_pnl);
        assert_eq!(pnl.net_pnl, 10.0);
    }
}
