use crate::error::Result;
use crate::indicators;
use crate::models::*;
use crate::param_utils::get_period_param;
use crate::strategy_utils::{
    closes, crossed_above, crossed_below, series_pair, simulate, PositionAction, PositionState,
};
use std::collections::HashMap;

pub struct MACDStrategy {
    pub template_id: String,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl MACDStrategy {
    pub fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        let fast_period = get_period_param(parameters, "fastPeriod", 12)?;
        let slow_period = get_period_param(parameters, "slowPeriod", 26)?;
        let signal_period = get_period_param(parameters, "signalPeriod", 9)?;
        Ok(Self {
            template_id: "macd".to_string(),
            fast_period,
            slow_period,
            signal_period,
        })
    }

    // First bar whose previous bar already has a signal value.
    fn start_index(&self) -> usize {
        self.fast_period.max(self.slow_period) + self.signal_period - 1
    }
}

impl super::Strategy for MACDStrategy {
    fn get_template_id(&self) -> &str {
        &self.template_id
    }

    fn get_min_data_points(&self) -> usize {
        self.start_index() + 1
    }

    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade> {
        let prices = closes(candles);
        let output = indicators::calculate_macd(
            &prices,
            self.fast_period,
            self.slow_period,
            self.signal_period,
        );

        simulate(candles, capital, self.start_index(), |i, state| {
            let Some((prev, curr)) = series_pair(&output.macd, &output.signal, i) else {
                return PositionAction::Hold;
            };
            match state {
                PositionState::Flat if crossed_above(prev, curr) => PositionAction::Enter,
                PositionState::Long { .. } if crossed_below(prev, curr) => {
                    PositionAction::Exit("MACD crossed below signal line".to_string())
                }
                _ => PositionAction::Hold,
            }
        })
    }
}
