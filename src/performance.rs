use crate::models::*;
use crate::strategy_utils::round_to;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Profit factor reported when there are winning trades and nothing was lost.
pub const PROFIT_FACTOR_NO_LOSSES: f64 = 999.0;

/// Periods per year used to annualize the Sharpe ratio.
pub const ANNUALIZATION_PERIODS: f64 = 252.0;

pub struct PerformanceCalculator;

impl PerformanceCalculator {
    /// One point per candle. Realized PnL is booked on every candle whose `date` matches a
    /// trade's `exit_date`.
    pub fn build_equity_curve(
        trades: &[Trade],
        candles: &[Candle],
        initial_capital: f64,
    ) -> Vec<EquityPoint> {
        let mut pnl_by_exit_date: HashMap<&str, f64> = HashMap::new();
        for trade in trades {
            *pnl_by_exit_date
                .entry(trade.exit_date.as_str())
                .or_insert(0.0) += trade.pnl;
        }

        let first_close = candles.first().map(|c| c.close).unwrap_or(0.0);
        let mut equity = initial_capital;

        candles
            .iter()
            .map(|candle| {
                if let Some(pnl) = pnl_by_exit_date.get(candle.date.as_str()) {
                    equity += pnl;
                }
                let buy_hold = if first_close > 0.0 {
                    initial_capital * (candle.close / first_close)
                } else {
                    initial_capital
                };
                EquityPoint {
                    date: candle.date.clone(),
                    equity: round_to(equity, 2),
                    buy_hold: round_to(buy_hold, 2),
                    price: candle.close,
                }
            })
            .collect()
    }

    pub fn calculate_performance(
        trades: &[Trade],
        equity_curve: &[EquityPoint],
        initial_capital: f64,
    ) -> PerformanceSummary {
        let total_trades = trades.len();
        let (wins, losses): (Vec<f64>, Vec<f64>) = {
            let (wins, losses): (Vec<&Trade>, Vec<&Trade>) =
                trades.iter().partition(|trade| trade.pnl > 0.0);
            (
                wins.iter().map(|t| t.pnl).collect(),
                losses.iter().map(|t| t.pnl).collect(),
            )
        };

        let win_rate = if total_trades > 0 {
            round_to(wins.len() as f64 / total_trades as f64 * 100.0, 1)
        } else {
            0.0
        };

        let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
        let total_return = if initial_capital > 0.0 {
            round_to(total_pnl / initial_capital * 100.0, 2)
        } else {
            0.0
        };

        let gross_win: f64 = wins.iter().sum();
        let gross_loss: f64 = losses.iter().sum();
        let avg_win = Self::average(&wins);
        let avg_loss = Self::average(&losses).abs();

        let profit_factor = if avg_loss > 0.0 {
            let denominator = if gross_loss != 0.0 { gross_loss } else { 1.0 };
            round_to(gross_win / denominator.abs(), 2)
        } else if !wins.is_empty() {
            PROFIT_FACTOR_NO_LOSSES
        } else {
            0.0
        };

        PerformanceSummary {
            total_return,
            win_rate,
            max_drawdown: round_to(
                Self::calculate_max_drawdown(equity_curve, initial_capital),
                2,
            ),
            sharpe_ratio: round_to(Self::calculate_sharpe_ratio(equity_curve), 2),
            total_trades,
            profit_factor,
            avg_win: round_to(avg_win, 2),
            avg_loss: round_to(avg_loss, 2),
        }
    }

    fn average(values: &[f64]) -> f64 {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Largest decline from the running peak in percent; the peak starts at `initial_capital`.
    pub fn calculate_max_drawdown(equity_curve: &[EquityPoint], initial_capital: f64) -> f64 {
        let mut peak_value = initial_capital;
        let mut max_drawdown_percent: f64 = 0.0;

        for point in equity_curve {
            if point.equity > peak_value {
                peak_value = point.equity;
            }
            let drawdown_percent = if peak_value > 0.0 {
                (peak_value - point.equity) / peak_value * 100.0
            } else {
                0.0
            };
            max_drawdown_percent = max_drawdown_percent.max(drawdown_percent);
        }

        max_drawdown_percent
    }

    /// Mean over sample standard deviation of per-point equity returns, scaled by
    /// `sqrt(252)`. No risk-free rate is subtracted.
    pub fn calculate_sharpe_ratio(equity_curve: &[EquityPoint]) -> f64 {
        let returns: Vec<f64> = equity_curve
            .windows(2)
            .map(|window| {
                let prev_value = window[0].equity;
                let curr_value = window[1].equity;
                if prev_value > 0.0 {
                    (curr_value - prev_value) / prev_value
                } else {
                    0.0
                }
            })
            .collect();

        if returns.len() < 2 {
            return 0.0;
        }

        let mean_return = returns.clone().mean();
        let std_dev = returns.std_dev();

        if std_dev == 0.0 || !std_dev.is_finite() {
            return 0.0;
        }

        mean_return / std_dev * ANNUALIZATION_PERIODS.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy_utils::test_support::candles_from_closes;

    fn trade(id: u32, exit_date: &str, pnl: f64) -> Trade {
        Trade {
            id,
            entry_date: "day-0000".to_string(),
            exit_date: exit_date.to_string(),
            entry_price: 100.0,
            exit_price: 100.0 + pnl,
            trade_type: TradeType::Long,
            pnl,
            pnl_pct: pnl,
            profitable: pnl > 0.0,
            reason: "test".to_string(),
            entry_index: 0,
            exit_index: 1,
        }
    }

    fn point(equity: f64) -> EquityPoint {
        EquityPoint {
            date: String::new(),
            equity,
            buy_hold: equity,
            price: 1.0,
        }
    }

    #[test]
    fn equity_curve_books_pnl_on_exit_dates() {
        let candles = candles_from_closes(&[100.0, 110.0, 105.0, 120.0]);
        let trades = vec![
            trade(1, "day-0001", 10.0),
            trade(2, "day-0003", -4.0),
            trade(3, "day-0003", 6.5),
        ];
        let curve = PerformanceCalculator::build_equity_curve(&trades, &candles, 1000.0);

        assert_eq!(curve.len(), 4);
        let equity: Vec<f64> = curve.iter().map(|p| p.equity).collect();
        assert_eq!(equity, vec![1000.0, 1010.0, 1010.0, 1012.5]);
        let buy_hold: Vec<f64> = curve.iter().map(|p| p.buy_hold).collect();
        assert_eq!(buy_hold, vec![1000.0, 1100.0, 1050.0, 1200.0]);
        assert_eq!(curve[2].price, 105.0);
        assert_eq!(curve[3].date, "day-0003");
    }

    #[test]
    fn summary_of_mixed_trades() {
        let candles = candles_from_closes(&[100.0, 110.0, 105.0, 120.0]);
        let trades = vec![
            trade(1, "day-0001", 10.0),
            trade(2, "day-0002", -4.0),
            trade(3, "day-0003", 6.0),
        ];
        let curve = PerformanceCalculator::build_equity_curve(&trades, &candles, 1000.0);
        let summary = PerformanceCalculator::calculate_performance(&trades, &curve, 1000.0);

        assert_eq!(summary.total_trades, 3);
        assert_eq!(summary.win_rate, 66.7);
        assert_eq!(summary.total_return, 1.2);
        assert_eq!(summary.avg_win, 8.0);
        assert_eq!(summary.avg_loss, 4.0);
        assert_eq!(summary.profit_factor, 4.0);
        // Peak 1010 then 1006.
        assert_eq!(summary.max_drawdown, 0.4);
        assert_eq!(summary.sharpe_ratio, 8.84);
    }

    #[test]
    fn zero_pnl_trade_counts_as_loss() {
        let trades = vec![trade(1, "day-0001", 5.0), trade(2, "day-0002", 0.0)];
        let summary = PerformanceCalculator::calculate_performance(&trades, &[], 1000.0);
        assert_eq!(summary.win_rate, 50.0);
        assert_eq!(summary.avg_loss, 0.0);
        // No losing PnL to divide by.
        assert_eq!(summary.profit_factor, PROFIT_FACTOR_NO_LOSSES);
    }

    #[test]
    fn profit_factor_fallbacks() {
        let winners = vec![trade(1, "day-0001", 5.0), trade(2, "day-0002", 7.0)];
        let summary = PerformanceCalculator::calculate_performance(&winners, &[], 1000.0);
        assert_eq!(summary.profit_factor, 999.0);

        let summary = PerformanceCalculator::calculate_performance(&[], &[], 1000.0);
        assert_eq!(summary.profit_factor, 0.0);
        assert_eq!(summary.win_rate, 0.0);
        assert_eq!(summary.avg_win, 0.0);
        assert_eq!(summary.avg_loss, 0.0);
        assert_eq!(summary.total_return, 0.0);

        let losers = vec![trade(1, "day-0001", -5.0)];
        let summary = PerformanceCalculator::calculate_performance(&losers, &[], 1000.0);
        assert_eq!(summary.profit_factor, 0.0);
    }

    #[test]
    fn non_positive_capital_degrades_total_return() {
        let trades = vec![trade(1, "day-0001", 5.0)];
        let summary = PerformanceCalculator::calculate_performance(&trades, &[], 0.0);
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
    }

    #[test]
    fn non_positive_peak_reports_no_drawdown() {
        let curve = vec![point(0.0), point(-5.0), point(0.0), point(-12.5)];
        let drawdown = PerformanceCalculator::calculate_max_drawdown(&curve, 0.0);
        assert_eq!(drawdown, 0.0);

        let trades = vec![trade(1, "day-0001", -5.0)];
        let summary = PerformanceCalculator::calculate_performance(&trades, &curve, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.total_return, 0.0);
    }

    #[test]
    fn drawdown_starts_from_initial_capital() {
        let curve = vec![point(950.0), point(1100.0), point(990.0), point(1050.0)];
        let drawdown = PerformanceCalculator::calculate_max_drawdown(&curve, 1000.0);
        assert!((drawdown - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sharpe_requires_two_returns_and_volatility() {
        assert_eq!(
            PerformanceCalculator::calculate_sharpe_ratio(&[point(1000.0), point(1010.0)]),
            0.0
        );
        assert_eq!(
            PerformanceCalculator::calculate_sharpe_ratio(&[
                point(1000.0),
                point(1000.0),
                point(1000.0)
            ]),
            0.0
        );
    }

    #[test]
    fn sharpe_uses_sample_standard_deviation() {
        let curve = vec![point(100.0), point(110.0), point(99.0), point(108.9)];
        // Returns: 0.1, -0.1, 0.1 -> mean 1/30, sample std dev sqrt(0.04 / 3)
        let expected = (0.1 / 3.0) / (0.04f64 / 3.0).sqrt() * 252f64.sqrt();
        let sharpe = PerformanceCalculator::calculate_sharpe_ratio(&curve);
        assert!((sharpe - expected).abs() < 1e-6);
    }
}
