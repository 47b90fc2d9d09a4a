use crate::error::{BacktestError, Result};
use std::collections::HashMap;

/// Longest lookback accepted as an override.
pub const MAX_PERIOD: usize = 1_000_000;

/// Extract a lookback period. Missing keys use `default`; present values are rounded and
/// must lie in `1..=MAX_PERIOD`.
pub fn get_period_param(params: &HashMap<String, f64>, key: &str, default: usize) -> Result<usize> {
    match params.get(key).copied() {
        None => Ok(default),
        Some(raw) if raw.is_finite() && (1.0..=MAX_PERIOD as f64).contains(&raw.round()) => {
            Ok(raw.round() as usize)
        }
        Some(raw) => Err(invalid(key, raw)),
    }
}

/// Extract a positive finite value with a default fallback.
pub fn get_positive_param(params: &HashMap<String, f64>, key: &str, default: f64) -> Result<f64> {
    match params.get(key).copied() {
        None => Ok(default),
        Some(raw) if raw.is_finite() && raw > 0.0 => Ok(raw),
        Some(raw) => Err(invalid(key, raw)),
    }
}

/// Extract a ratio in (0, 1) such as a stop-loss distance.
pub fn get_ratio_param(params: &HashMap<String, f64>, key: &str, default: f64) -> Result<f64> {
    match params.get(key).copied() {
        None => Ok(default),
        Some(raw) if raw.is_finite() && raw > 0.0 && raw < 1.0 => Ok(raw),
        Some(raw) => Err(invalid(key, raw)),
    }
}

/// Extract an oscillator level within [0, 100].
pub fn get_level_param(params: &HashMap<String, f64>, key: &str, default: f64) -> Result<f64> {
    match params.get(key).copied() {
        None => Ok(default),
        Some(raw) if (0.0..=100.0).contains(&raw) => Ok(raw),
        Some(raw) => Err(invalid(key, raw)),
    }
}

/// Parse `key=value` pairs as given on the command line.
pub fn parse_parameter_overrides(pairs: &[String]) -> anyhow::Result<HashMap<String, f64>> {
    let mut params = HashMap::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Parameter must be key=value (value: {})", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow::anyhow!("Parameter name is empty (value: {})", pair));
        }
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow::anyhow!("Parameter {} must be a number (value: {})", key, raw))?;
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

fn invalid(key: &str, value: f64) -> BacktestError {
    BacktestError::InvalidParameter {
        key: key.to_string(),
        value,
    }
}
