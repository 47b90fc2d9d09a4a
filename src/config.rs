use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::env;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_STRATEGY: &str = "ma_cross";
const SETTING_PREFIX: &str = "BACKTEST_";

/// Settings for the command-line runner. The library itself takes plain arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub initial_capital: f64,
    pub strategy_id: String,
    pub pretty_output: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            strategy_id: DEFAULT_STRATEGY.to_string(),
            pretty_output: true,
        }
    }
}

impl RuntimeSettings {
    pub fn from_env() -> Result<Self> {
        let settings: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with(SETTING_PREFIX))
            .collect();
        Self::from_settings_map(&settings)
    }

    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let initial_capital = match optional_setting(settings, "BACKTEST_INITIAL_CAPITAL") {
            Some(_) => require_setting_positive_f64(settings, "BACKTEST_INITIAL_CAPITAL")?,
            None => defaults.initial_capital,
        };
        let strategy_id = optional_setting(settings, "BACKTEST_STRATEGY")
            .map(str::to_string)
            .unwrap_or(defaults.strategy_id);
        let pretty_output = match optional_setting(settings, "BACKTEST_PRETTY") {
            Some(raw) => parse_bool("BACKTEST_PRETTY", raw)?,
            None => defaults.pretty_output,
        };

        Ok(Self {
            initial_capital,
            strategy_id,
            pretty_output,
        })
    }
}

fn optional_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn require_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    optional_setting(settings, key).ok_or_else(|| anyhow!("Missing required setting {}", key))
}

fn require_setting_positive_f64(settings: &HashMap<String, String>, key: &str) -> Result<f64> {
    let raw = require_setting(settings, key)?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    validate_capital(value).map_err(|_| anyhow!("Setting {} must be > 0 (value: {})", key, raw))
}

/// Capital handed to the runner must be a finite positive amount.
pub fn validate_capital(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(anyhow!("Initial capital must be finite (value: {})", value));
    }
    if value <= 0.0 {
        return Err(anyhow!("Initial capital must be > 0 (value: {})", value));
    }
    Ok(value)
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "Setting {} must be true or false (value: {})",
            key,
            raw
        )),
    }
}
