use crate::strategy::available_strategies;
use anyhow::Result;

pub fn run(pretty: bool) -> Result<()> {
    super::write_json(&available_strategies(), pretty)
}
