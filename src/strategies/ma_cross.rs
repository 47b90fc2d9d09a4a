use crate::error::{BacktestError, Result};
use crate::indicators;
use crate::models::*;
use crate::param_utils::get_period_param;
use crate::strategy_utils::{
    closes, crossed_above, crossed_below, series_pair, simulate, PositionAction, PositionState,
};
use std::collections::HashMap;

pub struct MACrossStrategy {
    pub template_id: String,
    fast_period: usize,
    slow_period: usize,
}

impl MACrossStrategy {
    pub fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        let fast_period = get_period_param(parameters, "fastPeriod", 20)?;
        let slow_period = get_period_param(parameters, "slowPeriod", 50)?;
        if fast_period >= slow_period {
            return Err(BacktestError::InvalidParameter {
                key: "fastPeriod".to_string(),
                value: fast_period as f64,
            });
        }
        Ok(Self {
            template_id: "ma_cross".to_string(),
            fast_period,
            slow_period,
        })
    }

    fn start_index(&self) -> usize {
        self.slow_period + 1
    }
}

impl super::Strategy for MACrossStrategy {
    fn get_template_id(&self) -> &str {
        &self.template_id
    }

    fn get_min_data_points(&self) -> usize {
        self.start_index() + 1
    }

    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade> {
        let prices = closes(candles);
        let fast = indicators::calculate_sma(&prices, self.fast_period);
        let slow = indicators::calculate_sma(&prices, self.slow_period);

        simulate(candles, capital, self.start_index(), |i, state| {
            let Some((prev, curr)) = series_pair(&fast, &slow, i) else {
                return PositionAction::Hold;
            };
            match state {
                PositionState::Flat if crossed_above(prev, curr) => PositionAction::Enter,
                PositionState::Long { .. } if crossed_below(prev, curr) => {
                    PositionAction::Exit(format!(
                        "SMA{} crossed below SMA{}",
                        self.fast_period, self.slow_period
                    ))
                }
                _ => PositionAction::Hold,
            }
        })
    }
}
