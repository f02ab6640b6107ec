//! Breakline CLI — scheduled runs and one-shot evaluation.
//!
//! Commands:
//! - `run` — drive the cycle loop on its fixed cadence against the paper
//!   broker, printing the per-cycle status lines
//! - `signal` — evaluate the breakout state machine once for one symbol
//! - `config check` — parse and validate a TOML config, echo the result

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use breakline_core::engine::CycleContext;
use breakline_core::{
    enrich, Broker, Granularity, PaperBroker, PositionState, StdoutNotifier,
};
use breakline_runner::{run_schedule, RunConfig};

#[derive(Parser)]
#[command(
    name = "breakline",
    about = "Breakline CLI — channel-breakout decision engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cycle loop on its schedule against the paper broker.
    Run {
        /// Path to a TOML config file. Defaults apply without one.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the instrument list (e.g. --symbols EUR/USD USD/JPY).
        #[arg(long, num_args = 1..)]
        symbols: Vec<String>,

        /// Override the trailing window length.
        #[arg(long)]
        window: Option<usize>,

        /// Override the candle granularity (m1, m5, m15, h1, d1).
        #[arg(long)]
        granularity: Option<String>,

        /// Override the cycle interval in seconds.
        #[arg(long)]
        interval: Option<u64>,

        /// Override the total run duration in seconds.
        #[arg(long)]
        duration: Option<u64>,

        /// Override the position size in pips.
        #[arg(long)]
        size: Option<u32>,
    },
    /// Evaluate the signal once for one symbol and print the decision.
    Signal {
        /// Symbol to evaluate (e.g. EUR/USD).
        #[arg(long)]
        symbol: String,

        /// Trailing window length.
        #[arg(long, default_value_t = 20)]
        window: usize,

        /// Candle granularity (m1, m5, m15, h1, d1).
        #[arg(long, default_value = "m1")]
        granularity: String,

        /// Assumed position state: flat, long, or short.
        #[arg(long, default_value = "flat")]
        position: String,
    },
    /// Config management commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Parse and validate a config file, echoing the effective settings.
    Check {
        /// Path to the TOML config file.
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            symbols,
            window,
            granularity,
            interval,
            duration,
            size,
        } => cmd_run(config, symbols, window, granularity, interval, duration, size),
        Commands::Signal {
            symbol,
            window,
            granularity,
            position,
        } => cmd_signal(&symbol, window, &granularity, &position),
        Commands::Config { action } => match action {
            ConfigAction::Check { path } => cmd_config_check(&path),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    config_path: Option<PathBuf>,
    symbols: Vec<String>,
    window: Option<usize>,
    granularity: Option<String>,
    interval: Option<u64>,
    duration: Option<u64>,
    size: Option<u32>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => RunConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RunConfig::default(),
    };

    if !symbols.is_empty() {
        config.strategy.symbols = symbols;
    }
    if let Some(window) = window {
        config.strategy.window = window;
    }
    if let Some(label) = granularity {
        config.strategy.granularity = parse_granularity(&label)?;
    }
    if let Some(interval) = interval {
        config.schedule.interval_secs = interval;
    }
    if let Some(duration) = duration {
        config.schedule.duration_secs = duration;
    }
    if let Some(size) = size {
        config.orders.position_size = size;
    }
    config.validate()?;

    let settings = config.to_engine_settings();
    let schedule = config.to_schedule();

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        ctrlc::set_handler(move || {
            println!("\n\nKeyboard exception received. Exiting.");
            cancel.store(true, Ordering::Relaxed);
        })
        .context("installing Ctrl-C handler")?;
    }

    let broker = PaperBroker::new();
    let notifier = StdoutNotifier;
    let ctx = CycleContext {
        broker: &broker,
        notifier: &notifier,
        settings: &settings,
    };

    println!(
        "Running {} instruments on {} candles every {}s for {}s (broker: {})",
        settings.instruments.len(),
        settings.granularity,
        schedule.interval.as_secs(),
        schedule.duration.as_secs(),
        broker.name(),
    );
    let cycles = run_schedule(&ctx, &schedule, &cancel);
    println!("Run finished: {cycles} cycles started");
    Ok(())
}

fn cmd_signal(symbol: &str, window: usize, granularity: &str, position: &str) -> Result<()> {
    if window < 2 {
        bail!("window must be >= 2, got {window}");
    }
    let granularity = parse_granularity(granularity)?;
    let state = match position {
        "flat" => PositionState::Flat,
        "long" => PositionState::Long,
        "short" => PositionState::Short,
        other => bail!("unknown position state '{other}' (expected flat, long, or short)"),
    };

    let broker = PaperBroker::new();
    // Enough depth for two fully-populated rows past the warmup.
    let bars = broker.recent_bars(symbol, granularity, window + 30)?;
    let rows = enrich(&bars, window);
    if rows.len() < 2 {
        bail!(
            "only {} usable rows for {symbol} after a {window}-bar warmup",
            rows.len()
        );
    }

    let latest = &rows[rows.len() - 1];
    let prev = &rows[rows.len() - 2];
    let decided = breakline_core::signal::evaluate(Some(prev), latest, state);

    println!("{symbol} ({granularity}, window {window}, {position}):");
    println!(
        "  close {:.5}  atr {:.5}  channel [{:.5}, {:.5}]",
        latest.bar.close, latest.atr, latest.lower, latest.upper
    );
    println!("  decision: {decided:?}");
    Ok(())
}

fn cmd_config_check(path: &PathBuf) -> Result<()> {
    let config = RunConfig::from_path(path)
        .with_context(|| format!("loading config from {}", path.display()))?;
    let settings = config.to_engine_settings();
    let schedule = config.to_schedule();

    println!("Config OK: {}", path.display());
    println!(
        "  instruments: {}",
        settings
            .instruments
            .iter()
            .map(|i| i.symbol.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  window {} on {} candles, fetching {} per cycle",
        settings.window, settings.granularity, settings.fetch_count
    );
    println!(
        "  {} pips per trade, {} pip stop",
        settings.instruments[0].position_size, settings.stop_offset_pips
    );
    println!(
        "  every {}s for {}s",
        schedule.interval.as_secs(),
        schedule.duration.as_secs()
    );
    Ok(())
}

fn parse_granularity(label: &str) -> Result<Granularity> {
    label.parse::<Granularity>().map_err(|e| anyhow::anyhow!(e))
}
