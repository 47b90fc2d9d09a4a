pub mod compare;
pub mod run;
pub mod strategies;

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};

pub(crate) fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if pretty {
        serde_json::to_writer_pretty(&mut out, value)
    } else {
        serde_json::to_writer(&mut out, value)
    };
    written.context("failed to serialize output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}
