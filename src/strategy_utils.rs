use crate::models::{Candle, Trade, TradeType};

/// Share of the starting capital committed to every position.
pub const POSITION_SIZE_RATIO: f64 = 0.10;

pub const PERIOD_END_REASON: &str = "Position closed at period end";

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Both sides of a two-series crossover are defined on the previous and current bar.
pub fn series_pair(
    first: &[Option<f64>],
    second: &[Option<f64>],
    index: usize,
) -> Option<((f64, f64), (f64, f64))> {
    if index == 0 {
        return None;
    }
    let prev = (first.get(index - 1).copied()??, second.get(index - 1).copied()??);
    let curr = (first.get(index).copied()??, second.get(index).copied()??);
    Some((prev, curr))
}

/// `first` moved from at-or-below `second` to strictly above it.
pub fn crossed_above(prev: (f64, f64), curr: (f64, f64)) -> bool {
    prev.0 <= prev.1 && curr.0 > curr.1
}

/// `first` moved from at-or-above `second` to strictly below it.
pub fn crossed_below(prev: (f64, f64), curr: (f64, f64)) -> bool {
    prev.0 >= prev.1 && curr.0 < curr.1
}

/// Percentage move from `entry_price` to `price`, negative for losses.
pub fn change_pct(entry_price: f64, price: f64) -> f64 {
    if entry_price > 0.0 {
        (price - entry_price) / entry_price * 100.0
    } else {
        0.0
    }
}

pub fn stop_loss_hit(entry_price: f64, price: f64, stop_loss_ratio: f64) -> bool {
    price <= entry_price * (1.0 - stop_loss_ratio)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long { entry_index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionAction {
    Hold,
    Enter,
    Exit(String),
}

/// Closed trades of one strategy run, numbered from 1 in closing order.
pub struct TradeBook<'a> {
    candles: &'a [Candle],
    position_size: f64,
    trades: Vec<Trade>,
}

impl<'a> TradeBook<'a> {
    pub fn new(candles: &'a [Candle], capital: f64) -> Self {
        Self {
            candles,
            position_size: capital * POSITION_SIZE_RATIO,
            trades: Vec::new(),
        }
    }

    pub fn close(&mut self, entry_index: usize, exit_index: usize, reason: impl Into<String>) {
        let entry = &self.candles[entry_index];
        let exit = &self.candles[exit_index];
        let pnl_pct = change_pct(entry.close, exit.close);
        let pnl = round_to(self.position_size * pnl_pct / 100.0, 2);

        self.trades.push(Trade {
            id: self.trades.len() as u32 + 1,
            entry_date: entry.date.clone(),
            exit_date: exit.date.clone(),
            entry_price: entry.close,
            exit_price: exit.close,
            trade_type: TradeType::Long,
            pnl,
            pnl_pct: round_to(pnl_pct, 2),
            profitable: pnl > 0.0,
            reason: reason.into(),
            entry_index,
            exit_index,
        });
    }

    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}

/// Folds a FLAT/LONG state machine over `start_index..candles.len()`.
///
/// `decide` sees the state before each bar and returns what to do on that bar's close.
/// Entries are ignored on the final bar, and a position still open after the last bar
/// is closed at its close with [`PERIOD_END_REASON`].
pub fn simulate<F>(candles: &[Candle], capital: f64, start_index: usize, mut decide: F) -> Vec<Trade>
where
    F: FnMut(usize, PositionState) -> PositionAction,
{
    let mut book = TradeBook::new(candles, capital);
    let last_index = candles.len().saturating_sub(1);

    let final_state = (start_index..candles.len()).fold(PositionState::Flat, |state, i| {
        match (state, decide(i, state)) {
            (PositionState::Flat, PositionAction::Enter) if i < last_index => {
                PositionState::Long { entry_index: i }
            }
            (PositionState::Long { entry_index }, PositionAction::Exit(reason)) => {
                book.close(entry_index, i, reason);
                PositionState::Flat
            }
            (state, _) => state,
        }
    });

    if let PositionState::Long { entry_index } = final_state {
        book.close(entry_index, last_index, PERIOD_END_REASON);
    }

    book.into_trades()
}
