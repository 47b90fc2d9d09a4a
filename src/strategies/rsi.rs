use crate::error::Result;
use crate::indicators;
use crate::models::*;
use crate::param_utils::{get_level_param, get_period_param, get_ratio_param};
use crate::strategy_utils::{
    change_pct, closes, simulate, stop_loss_hit, PositionAction, PositionState,
};
use std::collections::HashMap;

/// Buys the first close after RSI climbs back out of oversold territory.
pub struct RSIStrategy {
    pub template_id: String,
    period: usize,
    oversold_level: f64,
    overbought_level: f64,
    stop_loss_ratio: f64,
}

impl RSIStrategy {
    pub fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        let period = get_period_param(parameters, "period", 14)?;
        let oversold_level = get_level_param(parameters, "oversoldLevel", 30.0)?;
        let overbought_level = get_level_param(parameters, "overboughtLevel", 70.0)?;
        let stop_loss_ratio = get_ratio_param(parameters, "stopLossRatio", 0.05)?;
        Ok(Self {
            template_id: "rsi_ob".to_string(),
            period,
            oversold_level,
            overbought_level,
            stop_loss_ratio,
        })
    }

    fn start_index(&self) -> usize {
        self.period + 1
    }
}

impl super::Strategy for RSIStrategy {
    fn get_template_id(&self) -> &str {
        &self.template_id
    }

    fn get_min_data_points(&self) -> usize {
        self.start_index() + 1
    }

    fn generate_trades(&self, candles: &[Candle], capital: f64) -> Vec<Trade> {
        let prices = closes(candles);
        let rsi = indicators::calculate_rsi(&prices, self.period);

        simulate(candles, capital, self.start_index(), |i, state| match state {
            PositionState::Flat => match (rsi[i - 1], rsi[i]) {
                (Some(prev), Some(curr))
                    if prev <= self.oversold_level && curr > self.oversold_level =>
                {
                    PositionAction::Enter
                }
                _ => PositionAction::Hold,
            },
            PositionState::Long { entry_index } => {
                let entry_price = prices[entry_index];
                match rsi[i] {
                    Some(curr) if curr >= self.overbought_level => {
                        PositionAction::Exit(format!("RSI overbought ({curr:.1})"))
                    }
                    _ if stop_loss_hit(entry_price, prices[i], self.stop_loss_ratio) => {
                        PositionAction::Exit(format!(
                            "Stop loss hit ({:.2}%)",
                            change_pct(entry_price, prices[i])
                        ))
                    }
                    _ => PositionAction::Hold,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use crate::strategy_utils::test_support::candles_from_closes;

    fn declining(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 - i as f64).collect()
    }

    #[test]
    fn exits_when_rsi_reaches_overbought() {
        let mut closes = declining(20);
        closes.extend((1..20).map(|i| 81.0 + 2.0 * i as f64));
        let candles = candles_from_closes(&closes);
        let strategy = RSIStrategy::new(&HashMap::new()).unwrap();
        let trades = strategy.generate_trades(&candles, 1000.0);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_index, 22);
        assert_eq!(trades[0].exit_index, 27);
        assert_eq!(trades[0].entry_price, 87.0);
        assert_eq!(trades[0].exit_price, 97.0);
        assert_eq!(trades[0].pnl, 11.49);
        assert_eq!(trades[0].reason, "RSI overbought (72.7)");
    }

    #[test]
    fn stop_loss_closes_losing_position() {
        let mut closes = declining(20);
        closes.extend([84.0, 87.0, 89.0, 84.0, 80.0, 79.0]);
        let candles = candles_from_closes(&closes);
        let strategy = RSIStrategy::new(&HashMap::new()).unwrap();
        let trades = strategy.generate_trades(&candles, 1000.0);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_index, 21);
        assert_eq!(trades[0].exit_index, 24);
        assert_eq!(trades[0].pnl, -8.05);
        assert_eq!(trades[0].reason, "Stop loss hit (-8.05%)");
    }

    #[test]
    fn overbought_exit_takes_priority_over_stop() {
        let candles =
            candles_from_closes(&[100.0, 95.0, 90.0, 85.0, 80.0, 70.0, 75.0, 95.0, 85.0, 80.0]);
        let parameters: HashMap<String, f64> =
            [("period".to_string(), 3.0)].into_iter().collect();
        let strategy = RSIStrategy::new(&parameters).unwrap();
        let trades = strategy.generate_trades(&candles, 1000.0);

        // Bar 8 closes 10.5% under the entry with RSI(3) at 71.4.
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].entry_index, 7);
        assert_eq!(trades[0].exit_index, 8);
        assert_eq!(trades[0].pnl, -10.53);
        assert_eq!(trades[0].reason, "RSI overbought (71.4)");
    }

    #[test]
    fn flat_prices_stay_out_of_the_market() {
        let candles = candles_from_closes(&[50.0; 40]);
        let strategy = RSIStrategy::new(&HashMap::new()).unwrap();
        assert!(strategy.generate_trades(&candles, 1000.0).is_empty());
    }
}
