use crate::error::Result;
use crate::models::{BacktestResult, Candle};
use crate::performance::PerformanceCalculator;
use crate::strategy::{create_strategy, Strategy};
use log::{debug, warn};
use std::collections::HashMap;

/// Replays `candles` through the strategy registered as `strategy_id` with its default
/// parameters.
pub fn run_backtest(candles: &[Candle], strategy_id: &str, capital: f64) -> Result<BacktestResult> {
    run_backtest_with_parameters(candles, strategy_id, capital, &HashMap::new())
}

pub fn run_backtest_with_parameters(
    candles: &[Candle],
    strategy_id: &str,
    capital: f64,
    parameters: &HashMap<String, f64>,
) -> Result<BacktestResult> {
    let strategy = create_strategy(strategy_id, parameters).map_err(|err| {
        warn!("Backtest rejected: {}", err);
        err
    })?;
    Ok(Backtester::new(strategy.as_ref(), capital).run(candles))
}

/// Runs one strategy over candle series with a fixed starting capital.
pub struct Backtester<'a> {
    strategy: &'a dyn Strategy,
    initial_capital: f64,
}

impl<'a> Backtester<'a> {
    pub fn new(strategy: &'a dyn Strategy, initial_capital: f64) -> Self {
        Self {
            strategy,
            initial_capital,
        }
    }

    pub fn run(&self, candles: &[Candle]) -> BacktestResult {
        let template_id = self.strategy.get_template_id();
        let min_data_points = self.strategy.get_min_data_points();
        if candles.len() < min_data_points {
            debug!(
                "{} needs {} candles before it can trade, got {}",
                template_id,
                min_data_points,
                candles.len()
            );
        }

        let trades = self
            .strategy
            .generate_trades(candles, self.initial_capital);
        let equity_curve =
            PerformanceCalculator::build_equity_curve(&trades, candles, self.initial_capital);
        let summary =
            PerformanceCalculator::calculate_performance(&trades, &equity_curve, self.initial_capital);

        debug!(
            "Backtest {}: {} candles, {} trades, total return {}%",
            template_id,
            candles.len(),
            trades.len(),
            summary.total_return
        );

        BacktestResult::new(template_id, trades, summary, equity_curve, candles.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BacktestError;
    use crate::strategy_utils::test_support::candles_from_closes;

    #[test]
    fn unknown_strategy_is_an_error() {
        let candles = candles_from_closes(&[100.0, 101.0]);
        let err = run_backtest(&candles, "not_a_strategy", 1000.0).unwrap_err();
        assert_eq!(
            err,
            BacktestError::UnknownStrategy("not_a_strategy".to_string())
        );
    }

    #[test]
    fn single_candle_produces_flat_curve() {
        let candles = candles_from_closes(&[42_000.0]);
        let result = run_backtest(&candles, "ma_cross", 1000.0).unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.equity_curve.len(), 1);
        assert_eq!(result.equity_curve[0].equity, 1000.0);
        assert_eq!(result.equity_curve[0].buy_hold, 1000.0);
        assert_eq!(result.total_trades, 0);
        assert_eq!(result.sharpe_ratio, 0.0);
        assert_eq!(result.candles, candles);
    }

    #[test]
    fn empty_candles_are_not_an_error() {
        let result = run_backtest(&[], "breakout", 1000.0).unwrap();
        assert!(result.trades.is_empty());
        assert!(result.equity_curve.is_empty());
        assert_eq!(result.max_drawdown, 0.0);
    }

    #[test]
    fn result_carries_summary_of_trades() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        closes.extend((1..20).map(|i| 81.0 + 2.0 * i as f64));
        let candles = candles_from_closes(&closes);
        let result = run_backtest(&candles, "rsi_ob", 1000.0).unwrap();

        assert_eq!(result.strategy_id, "rsi_ob");
        assert_eq!(result.total_trades, 1);
        assert_eq!(result.win_rate, 100.0);
        assert_eq!(result.total_return, 1.15);
        assert_eq!(result.profit_factor, 999.0);
        assert_eq!(result.avg_win, 11.49);
        assert_eq!(result.equity_curve[27].equity, 1011.49);
        assert_eq!(result.equity_curve.last().map(|p| p.equity), Some(1011.49));
    }

    #[test]
    fn parameter_overrides_reach_the_strategy() {
        let candles = candles_from_closes(&[100.0; 10]);
        let parameters: HashMap<String, f64> =
            [("period".to_string(), 0.0)].into_iter().collect();
        let err = run_backtest_with_parameters(&candles, "bollinger", 1000.0, &parameters)
            .unwrap_err();
        assert!(matches!(err, BacktestError::InvalidParameter { .. }));
    }

    #[test]
    fn oversized_period_overrides_are_rejected() {
        let candles = candles_from_closes(&[100.0; 30]);
        for (id, key) in [
            ("bollinger", "period"),
            ("macd", "signalPeriod"),
            ("ma_cross", "slowPeriod"),
            ("rsi_ob", "period"),
            ("breakout", "lookback"),
        ] {
            let parameters: HashMap<String, f64> =
                [(key.to_string(), 1e20)].into_iter().collect();
            let err = run_backtest_with_parameters(&candles, id, 1000.0, &parameters)
                .unwrap_err();
            assert_eq!(
                err,
                BacktestError::InvalidParameter {
                    key: key.to_string(),
                    value: 1e20
                },
                "{id}"
            );
        }
    }
}
