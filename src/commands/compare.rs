use crate::backtester::run_backtest;
use crate::candle_utils::load_candles;
use crate::config::{validate_capital, RuntimeSettings};
use crate::error::Result as EngineResult;
use crate::models::Candle;
use crate::strategy::available_strategies;
use anyhow::Result;
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub strategy: String,
    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub profit_factor: f64,
}

/// Backtests every registered strategy on the same candles, in catalog order.
pub fn compare_strategies(
    candles: &[Candle],
    capital: f64,
) -> EngineResult<Vec<StrategyComparison>> {
    available_strategies()
        .par_iter()
        .map(|info| -> EngineResult<StrategyComparison> {
            let result = run_backtest(candles, info.id, capital)?;
            Ok(StrategyComparison {
                strategy: info.id.to_string(),
                total_return: result.total_return,
                win_rate: result.win_rate,
                max_drawdown: result.max_drawdown,
                sharpe_ratio: result.sharpe_ratio,
                total_trades: result.total_trades,
                profit_factor: result.profit_factor,
            })
        })
        .collect()
}

pub fn run(settings: &RuntimeSettings, candles_path: &Path, capital: Option<f64>) -> Result<()> {
    let capital = validate_capital(capital.unwrap_or(settings.initial_capital))?;
    let candles = load_candles(candles_path)?;
    let rows = compare_strategies(&candles, capital)?;

    if let Some(best) = rows
        .iter()
        .max_by(|a, b| a.total_return.total_cmp(&b.total_return))
    {
        info!(
            "Best of {} strategies on {} candles: {} ({}%)",
            rows.len(),
            candles.len(),
            best.strategy,
            best.total_return
        );
    }

    super::write_json(&rows, settings.pretty_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy_utils::test_support::candles_from_closes;

    #[test]
    fn compares_every_strategy_in_catalog_order() {
        let closes: Vec<f64> = (0..150)
            .map(|i| 100.0 + (i as f64 / 6.0).sin() * 8.0)
            .collect();
        let candles = candles_from_closes(&closes);
        let rows = compare_strategies(&candles, 1000.0).unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.strategy.as_str()).collect();
        assert_eq!(ids, vec!["ma_cross", "rsi_ob", "macd", "bollinger", "breakout"]);
        for row in &rows {
            let single = run_backtest(&candles, &row.strategy, 1000.0).unwrap();
            assert_eq!(row.total_return, single.total_return);
            assert_eq!(row.total_trades, single.total_trades);
        }
    }
}
