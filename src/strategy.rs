use crate::error::{BacktestError, Result};
use crate::models::*;
use std::collections::HashMap;

/// A long-only rule set replayed over a full candle series.
pub trait Strategy {
    fn get_template_id(&self) -> &str;
    /// Candles needed before the first entry signal can be evaluated.
    fn get_min_data_points(&self) -> usize;
    /// Every trade closed over `candles`, sized from the starting `capital`.
    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade>;
}

#[path = "strategies/ma_cross.rs"]
pub mod ma_cross;

pub use ma_cross::MACrossStrategy;

#[path = "strategies/rsi.rs"]
pub mod rsi;

pub use rsi::RSIStrategy;

#[path = "strategies/macd.rs"]
pub mod macd;

pub use macd::MACDStrategy;

#[path = "strategies/bollinger.rs"]
pub mod bollinger;

pub use bollinger::BollingerStrategy;

#[path = "strategies/breakout.rs"]
pub mod breakout;

pub use breakout::BreakoutStrategy;

pub const STRATEGY_CATALOG: &[StrategyInfo] = &[
    StrategyInfo {
        id: "ma_cross",
        name: "MA Crossover",
        description: "Buy when SMA20 crosses above SMA50, sell when it crosses back below",
        min_data_points: 52,
    },
    StrategyInfo {
        id: "rsi_ob",
        name: "RSI Oversold/Overbought",
        description: "Buy when RSI(14) recovers above 30, sell at 70 or a 5% stop loss",
        min_data_points: 16,
    },
    StrategyInfo {
        id: "macd",
        name: "MACD Crossover",
        description: "Buy when the MACD line crosses above its signal line, sell on the cross below",
        min_data_points: 35,
    },
    StrategyInfo {
        id: "bollinger",
        name: "Bollinger Bounce",
        description: "Buy at the lower band, sell at the upper band or a 7% stop loss",
        min_data_points: 22,
    },
    StrategyInfo {
        id: "breakout",
        name: "Breakout",
        description: "Buy above the 20-bar high, sell below the 20-bar low or a 5% stop loss",
        min_data_points: 21,
    },
];

pub fn available_strategies() -> &'static [StrategyInfo] {
    STRATEGY_CATALOG
}

pub fn strategy_info(template_id: &str) -> Option<&'static StrategyInfo> {
    STRATEGY_CATALOG.iter().find(|info| info.id == template_id)
}

pub fn create_strategy(
    template_id: &str,
    parameters: &HashMap<String, f64>,
) -> Result<Box<dyn Strategy + Send + Sync>> {
    match template_id {
        "ma_cross" => Ok(Box::new(MACrossStrategy::new(parameters)?)),
        "rsi_ob" => Ok(Box::new(RSIStrategy::new(parameters)?)),
        "macd" => Ok(Box::new(MACDStrategy::new(parameters)?)),
        "bollinger" => Ok(Box::new(BollingerStrategy::new(parameters)?)),
        "breakout" => Ok(Box::new(BreakoutStrategy::new(parameters)?)),
        _ => Err(BacktestError::UnknownStrategy(template_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_default_strategies() {
        let empty = HashMap::new();
        for info in available_strategies() {
            let strategy = create_strategy(info.id, &empty).expect("catalog strategy");
            assert_eq!(strategy.get_template_id(), info.id);
            assert_eq!(strategy.get_min_data_points(), info.min_data_points);
        }
    }

    #[test]
    fn unknown_template_is_rejected() {
        let err = create_strategy("not_a_strategy", &HashMap::new())
            .err()
            .expect("expected error");
        assert_eq!(
            err,
            BacktestError::UnknownStrategy("not_a_strategy".to_string())
        );
        assert_eq!(err.to_string(), "Unknown strategy: not_a_strategy");
    }

    #[test]
    fn strategy_info_lookup() {
        assert_eq!(strategy_info("macd").map(|i| i.name), Some("MACD Crossover"));
        assert!(strategy_info("psar").is_none());
    }
}
