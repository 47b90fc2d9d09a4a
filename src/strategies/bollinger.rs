use crate::error::Result;
use crate::indicators;
use crate::models::*;
use crate::param_utils::{get_period_param, get_positive_param, get_ratio_param};
use crate::strategy_utils::{
    change_pct, closes, simulate, stop_loss_hit, PositionAction, PositionState,
};
use std::collections::HashMap;

pub struct BollingerStrategy {
    pub template_id: String,
    period: usize,
    std_dev: f64,
    stop_loss_ratio: f64,
}

impl BollingerStrategy {
    pub fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        let period = get_period_param(parameters, "period", 20)?;
        let std_dev = get_positive_param(parameters, "stdDev", 2.0)?;
        let stop_loss_ratio = get_ratio_param(parameters, "stopLossRatio", 0.07)?;
        Ok(Self {
            template_id: "bollinger".to_string(),
            period,
            std_dev,
            stop_loss_ratio,
        })
    }

    fn start_index(&self) -> usize {
        self.period + 1
    }
}

impl super::Strategy for BollingerStrategy {
    fn get_template_id(&self) -> &str {
        &self.template_id
    }

    fn get_min_data_points(&self) -> usize {
        self.start_index() + 1
    }

    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade> {
        let prices = closes(candles);
        let bands = indicators::calculate_bollinger_bands(&prices, self.period, self.std_dev);

        simulate(candles, capital, self.start_index(), |i, state| {
            let close = prices[i];
            match state {
                PositionState::Flat => match bands.lower[i] {
                    Some(lower) if close <= lower => PositionAction::Enter,
                    _ => PositionAction::Hold,
                },
                PositionState::Long { entry_index } => {
                    let entry_price = prices[entry_index];
                    match bands.upper[i] {
                        Some(upper) if close >= upper => {
                            PositionAction::Exit("Price reached upper band".to_string())
                        }
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
