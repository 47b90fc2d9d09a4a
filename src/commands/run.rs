use crate::backtester::run_backtest_with_parameters;
use crate::candle_utils::load_candles;
use crate::config::{validate_capital, RuntimeSettings};
use crate::param_utils::parse_parameter_overrides;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

pub struct RunOptions<'a> {
    pub candles_path: &'a Path,
    pub strategy_id: Option<&'a str>,
    pub capital: Option<f64>,
    pub parameters: &'a [String],
    pub compact: bool,
}

pub fn run(settings: &RuntimeSettings, options: RunOptions<'_>) -> Result<()> {
    let strategy_id = options.strategy_id.unwrap_or(settings.strategy_id.as_str());
    let capital = validate_capital(options.capital.unwrap_or(settings.initial_capital))?;
    let parameters = parse_parameter_overrides(options.parameters)?;
    let candles = load_candles(options.candles_path)?;

    let result = run_backtest_with_parameters(&candles, strategy_id, capital, &parameters)
        .with_context(|| format!("backtest of {} failed", strategy_id))?;

    info!(
        "{}: {} trades, return {}%, win rate {}%, max drawdown {}%, sharpe {}",
        strategy_id,
        result.total_trades,
        result.total_return,
        result.win_rate,
        result.max_drawdown,
        result.sharpe_ratio
    );

    super::write_json(&result, settings.pretty_output && !options.compact)
}
