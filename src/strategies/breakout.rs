use crate::error::Result;
use crate::indicators;
use crate::models::*;
use crate::param_utils::{get_period_param, get_ratio_param};
use crate::strategy_utils::{
    change_pct, closes, simulate, stop_loss_hit, PositionAction, PositionState,
};
use std::collections::HashMap;

/// Channel breakout on the highs and lows of the preceding `lookback` bars.
pub struct BreakoutStrategy {
    pub template_id: String,
    lookback: usize,
    stop_loss_ratio: f64,
}

impl BreakoutStrategy {
    pub fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        let lookback = get_period_param(parameters, "lookback", 20)?;
        let stop_loss_ratio = get_ratio_param(parameters, "stopLossRatio", 0.05)?;
        Ok(Self {
            template_id: "breakout".to_string(),
            lookback,
            stop_loss_ratio,
        })
    }
}

impl super::Strategy for BreakoutStrategy {
    fn get_template_id(&self) -> &str {
        &self.template_id
    }

    fn get_min_data_points(&self) -> usize {
        self.lookback + 1
    }

    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade> {
        let prices = closes(candles);
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let channels = indicators::calculate_donchian_channels(&highs, &lows, self.lookback);

        simulate(candles, capital, self.lookback, |i, state| {
            let close = prices[i];
            match state {
                PositionState::Flat => match channels.upper[i] {
                    Some(high) if close > high => PositionAction::Enter,
                    _ => PositionAction::Hold,
                },
                PositionState::Long { entry_index } => {
                    let entry_price = prices[entry_index];
                    match channels.lower[i] {
                        Some(low) if close < low => PositionAction::Exit(format!(
                            "Price broke below {}-bar low",
                            self.lookback
                        )),
                        _ if stop_loss_hit(entry_price, close, self.stop_loss_ratio) => {
                            PositionAction::Exit(format!(
                                "Stop loss hit ({:.2}%)",
                                change_pct(entry_price, close)
                            ))
                        }
                        _ => PositionAction::Hold,
                    }
                }
            }
        })
    }
}
