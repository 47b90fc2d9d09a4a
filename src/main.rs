use anyhow::Result;
use backtest_engine::{
    commands::{compare, run, strategies},
    config::RuntimeSettings,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "backtest-engine")]
#[command(about = "Deterministic candle backtester for a fixed library of trading strategies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one strategy and print the full result as JSON
    Run {
        /// JSON array of candles, oldest first ("-" reads stdin)
        #[arg(long, value_name = "PATH")]
        candles: PathBuf,
        /// Strategy id (defaults to BACKTEST_STRATEGY or ma_cross)
        #[arg(short, long)]
        strategy: Option<String>,
        /// Starting capital (defaults to BACKTEST_INITIAL_CAPITAL or 10000)
        #[arg(long)]
        capital: Option<f64>,
        /// Strategy parameter override, e.g. --param period=21
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// List the available strategies
    Strategies,
    /// Backtest every strategy on the same candles and print a comparison
    Compare {
        /// JSON array of candles, oldest first ("-" reads stdin)
        #[arg(long, value_name = "PATH")]
        candles: PathBuf,
        /// Starting capital (defaults to BACKTEST_INITIAL_CAPITAL or 10000)
        #[arg(long)]
        capital: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let Cli { command } = Cli::parse();
    let settings = RuntimeSettings::from_env()?;

    info!("Starting backtest engine. Not financial advice.");

    match command {
        Commands::Run {
            candles,
            strategy,
            capital,
            params,
            compact,
        } => {
            run::run(
                &settings,
                run::RunOptions {
                    candles_path: &candles,
                    strategy_id: strategy.as_deref(),
                    capital,
                    parameters: &params,
                    compact,
                },
            )?;
        }
        Commands::Strategies => {
            strategies::run(settings.pretty_output)?;
        }
        Commands::Compare { candles, capital } => {
            compare::run(&settings, &candles, capital)?;
        }
    }

    Ok(())
}
