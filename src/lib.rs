pub mod backtester;
pub mod commands;
pub mod candle_utils;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod param_utils;
pub mod performance;
pub mod strategy;
pub mod strategy_utils;

pub use backtester::{run_backtest, run_backtest_with_parameters, Backtester};
pub use error::{BacktestError, Result};
pub use models::{BacktestResult, Candle, EquityPoint, Trade, TradeType};
pub use strategy::{available_strategies, create_strategy, Strategy, STRATEGY_CATALOG};
