//! Indicator series aligned to their input. Indices without enough history are `None`.

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut sma_values = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        if i + 1 < period {
            sma_values.push(None);
            continue;
        }
        let window_sum: f64 = prices[i + 1 - period..=i].iter().sum();
        sma_values.push(Some(window_sum / period as f64));
    }

    sma_values
}

pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut ema_values = vec![None; prices.len()];
    if period == 0 || prices.len() < period {
        return ema_values;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let seed: f64 = prices[..period].iter().sum::<f64>() / period as f64;
    ema_values[period - 1] = Some(seed);

    for i in period..prices.len() {
        ema_values[i] = ema_values[i - 1]
            .map(|prev| prices[i] * multiplier + prev * (1.0 - multiplier));
    }

    ema_values
}

fn rsi_from_avgs(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

/// RSI where every value, including the seed at `period`, averages the raw gains and
/// losses of the trailing `period` steps. There is no Wilder smoothing past the seed.
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi_values = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return rsi_values;
    }

    // gains[j] / losses[j] hold the move from prices[j] to prices[j + 1].
    let mut gains = Vec::with_capacity(prices.len() - 1);
    let mut losses = Vec::with_capacity(prices.len() - 1);
    for window in prices.windows(2) {
        let delta = window[1] - window[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    for i in period..prices.len() {
        let avg_gain = gains[i - period..i].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[i - period..i].iter().sum::<f64>() / period as f64;
        rsi_values[i] = Some(rsi_from_avgs(avg_gain, avg_loss));
    }

    rsi_values
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(
    prices: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdOutput {
    let fast_ema = calculate_ema(prices, fast_period);
    let slow_ema = calculate_ema(prices, slow_period);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(fast, slow)| match (fast, slow) {
            (Some(fast), Some(slow)) => Some(fast - slow),
            _ => None,
        })
        .collect();

    // The signal EMA runs over the defined MACD values only, then is mapped back
    // onto the positions those values came from.
    let (positions, compacted): (Vec<usize>, Vec<f64>) = macd
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| (i, v)))
        .unzip();
    let compacted_signal = calculate_ema(&compacted, signal_period);

    let mut signal = vec![None; prices.len()];
    for (position, value) in positions.iter().zip(compacted_signal) {
        signal[*position] = value;
    }

    let histogram = macd
        .iter()
        .zip(signal.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdOutput {
        macd,
        signal,
        histogram,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBandsOutput {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bands use the population standard deviation of the trailing window.
pub fn calculate_bollinger_bands(
    prices: &[f64],
    period: usize,
    std_dev: f64,
) -> BollingerBandsOutput {
    let middle = calculate_sma(prices, period);
    let mut upper = vec![None; prices.len()];
    let mut lower = vec![None; prices.len()];

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else {
            continue;
        };
        let slice = &prices[i + 1 - period..=i];
        let variance = slice.iter().map(|&val| (val - mean).powi(2)).sum::<f64>() / period as f64;
        let standard_deviation = variance.sqrt();

        upper[i] = Some(mean + std_dev * standard_deviation);
        lower[i] = Some(mean - std_dev * standard_deviation);
    }

    BollingerBandsOutput {
        upper,
        middle,
        lower,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonchianOutput {
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Highest high and lowest low of the `lookback` bars strictly before each index.
pub fn calculate_donchian_channels(highs: &[f64], lows: &[f64], lookback: usize) -> DonchianOutput {
    let len = highs.len().min(lows.len());
    let mut upper = vec![None; len];
    let mut lower = vec![None; len];
    if lookback == 0 {
        return DonchianOutput { upper, lower };
    }

    for i in lookback..len {
        let window = i - lookback..i;
        upper[i] = Some(
            highs[window.clone()]
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        );
        lower[i] = Some(lows[window].iter().copied().fold(f64::INFINITY, f64::min));
    }

    DonchianOutput { upper, lower }
}
