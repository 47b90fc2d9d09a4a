use crate::models::Candle;
use anyhow::{Context, Result};
use chrono::DateTime;
use log::warn;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Loads a JSON array of candles from `path`, or from stdin when `path` is `-`.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    if path.as_os_str() == "-" {
        return read_candles(io::stdin().lock()).context("failed to read candles from stdin");
    }
    let file = File::open(path)
        .with_context(|| format!("failed to open candle file {}", path.display()))?;
    read_candles(BufReader::new(file))
        .with_context(|| format!("failed to read candles from {}", path.display()))
}

pub fn read_candles<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let mut candles: Vec<Candle> =
        serde_json::from_reader(reader).context("candles must be a JSON array")?;
    fill_missing_dates(&mut candles);
    let out_of_order = count_out_of_order(&candles);
    if out_of_order > 0 {
        warn!(
            "{} of {} candles are not in ascending time order; results assume oldest first",
            out_of_order,
            candles.len()
        );
    }
    Ok(candles)
}

/// Derives a UTC display date from `time` for candles that arrived without one.
pub fn fill_missing_dates(candles: &mut [Candle]) {
    for candle in candles.iter_mut() {
        if !candle.date.trim().is_empty() {
            continue;
        }
        if let Some(timestamp) = DateTime::from_timestamp_millis(candle.time) {
            candle.date = timestamp.format(DATE_FORMAT).to_string();
        }
    }
}

/// Number of candles whose `time` does not strictly increase on the previous one.
pub fn count_out_of_order(candles: &[Candle]) -> usize {
    candles
        .windows(2)
        .filter(|pair| pair[1].time <= pair[0].time)
        .count()
}
