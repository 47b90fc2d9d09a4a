use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Bar open time in epoch milliseconds.
    pub time: i64,
    /// Display label; also the key trades use to reference the bar.
    #[serde(default)]
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Long,
    Short,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Long => "LONG",
            TradeType::Short => "SHORT",
        }
    }
}

/// A closed position. Trades only exist once the position has been exited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: u32,
    pub entry_date: String,
    pub exit_date: String,
    pub entry_price: f64,
    pub exit_price: f64,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub profitable: bool,
    pub reason: String,
    /// Candle indices of entry and exit; not part of the wire shape.
    #[serde(skip)]
    pub entry_index: usize,
    #[serde(skip)]
    pub exit_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: String,
    pub equity: f64,
    pub buy_hold: f64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestResult {
    pub strategy_id: String,
    pub trades: Vec<Trade>,
    pub total_return: f64,
    pub win_rate: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub candles: Vec<Candle>,
}

impl BacktestResult {
    pub fn new(
        strategy_id: &str,
        trades: Vec<Trade>,
        summary: PerformanceSummary,
        equity_curve: Vec<EquityPoint>,
        candles: Vec<Candle>,
    ) -> Self {
        Self {
            strategy_id: strategy_id.to_string(),
            trades,
            total_return: summary.total_return,
            win_rate: summary.win_rate,
            max_drawdown: summary.max_drawdown,
            sharpe_ratio: summary.sharpe_ratio,
            total_trades: summary.total_trades,
            profit_factor: summary.profit_factor,
            avg_win: summary.avg_win,
            avg_loss: summary.avg_loss,
            equity_curve,
            candles,
        }
    }

    pub fn summary(&self) -> PerformanceSummary {
        PerformanceSummary {
            total_return: self.total_return,
            win_rate: self.win_rate,
            max_drawdown: self.max_drawdown,
            sharpe_ratio: self.sharpe_ratio,
            total_trades: self.total_trades,
            profit_factor: self.profit_factor,
            avg_win: self.avg_win,
            avg_loss: self.avg_loss,
        }
    }
}

/// Registry metadata shown by strategy pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub min_data_points: usize,
}
