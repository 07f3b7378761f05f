//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_adapter::{ConfigSymbolInfo, LastCloseTicks, PaperAccount, PaperBroker};
use crate::domain::config_validation::{validate_paper_config, validate_trader_config};
use crate::domain::error::TraderError;
use crate::domain::registry::PositionRegistry;
use crate::domain::signal::{CycleReport, Decision, MarketPorts, SignalEngine, SkipReason};
use crate::domain::sizing::SizingBasis;
use crate::domain::strategy::{
    DEFAULT_BAR_COUNT, DEFAULT_STOP_BUFFER_POINTS, DEFAULT_SWING_WINDOW, StrategyConfig, Timeframe,
};
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_POLL_INTERVAL_SECS: i64 = 60;
pub const DEFAULT_REENTRY_COOLDOWN_CYCLES: i64 = 60;

#[derive(Parser, Debug)]
#[command(name = "pullbacktrader", about = "Trend-pullback entry signal generator")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate the watchlist every poll interval
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many cycles instead of running forever
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        cycles: Option<u64>,
    },
    /// Evaluate the watchlist once and print the outcome
    Once {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(&cli.log_level);

    match cli.command {
        Command::Run { config, cycles } => run_loop(&config, cycles),
        Command::Once { config } => run_once(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| TraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Validate the trading sections and build the engine configuration.
pub fn build_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, TraderError> {
    validate_trader_config(config)?;

    let timeframe_raw = config.get_string("general", "timeframe").unwrap_or_default();
    let timeframe = timeframe_raw
        .parse::<Timeframe>()
        .map_err(|e| TraderError::ConfigInvalid {
            section: "general".to_string(),
            key: "timeframe".to_string(),
            reason: e.to_string(),
        })?;
    let symbols = parse_symbols(&config.get_string("general", "symbols").unwrap_or_default())?;

    Ok(StrategyConfig {
        symbols,
        timeframe,
        bar_count: config.get_int("general", "bar_count", DEFAULT_BAR_COUNT as i64) as usize,
        ema_period: config.get_int("strategy", "ema_period", 0) as usize,
        fib_retrace: config.get_double("strategy", "fib_retrace", 0.0),
        swing_window: config.get_int("strategy", "swing_window", DEFAULT_SWING_WINDOW as i64)
            as usize,
        stop_buffer_points: config.get_double(
            "strategy",
            "stop_buffer_points",
            DEFAULT_STOP_BUFFER_POINTS,
        ),
        risk_per_trade: config.get_double("risk", "max_risk_per_trade", 0.0),
    })
}

pub fn build_registry(config: &dyn ConfigPort) -> PositionRegistry {
    let cooldown = config.get_int("risk", "reentry_cooldown_cycles", DEFAULT_REENTRY_COOLDOWN_CYCLES);
    PositionRegistry::new(cooldown.max(0) as u64)
}

/// Everything a paper session needs, built from one configuration file.
pub struct PaperSession {
    pub engine: SignalEngine,
    pub registry: PositionRegistry,
    pub feed: CsvMarketData,
    pub account: PaperAccount,
    pub symbols: ConfigSymbolInfo,
    pub broker: PaperBroker,
    pub spread_points: f64,
    pub poll_interval: Duration,
}

impl PaperSession {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TraderError> {
        let strategy = build_strategy_config(config)?;
        validate_paper_config(config)?;

        let data_dir = config.get_string("paper", "data_dir").unwrap_or_default();
        let journal = config
            .get_string("paper", "journal")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let poll_secs = config.get_int("general", "poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS);

        Ok(Self {
            symbols: ConfigSymbolInfo::from_config(config, &strategy.symbols),
            registry: build_registry(config),
            engine: SignalEngine::new(strategy),
            feed: CsvMarketData::new(PathBuf::from(data_dir.trim())),
            account: PaperAccount::from_config(config),
            broker: PaperBroker::new(journal),
            spread_points: config.get_double("paper", "spread_points", 0.0),
            poll_interval: Duration::from_secs(poll_secs.max(0) as u64),
        })
    }

    pub fn run_cycle(&mut self, cycle: u64) -> Result<CycleReport, TraderError> {
        let ticks = LastCloseTicks::new(
            &self.feed,
            &self.symbols,
            self.engine.config().timeframe,
            self.spread_points,
        );
        let ports = MarketPorts {
            data: &self.feed,
            account: &self.account,
            symbols: &self.symbols,
            ticks: &ticks,
            broker: &self.broker,
        };
        self.engine.run_cycle(&ports, &mut self.registry, cycle)
    }
}

fn open_session(config_path: &Path) -> Result<PaperSession, TraderError> {
    let config = load_config(config_path)?;
    PaperSession::from_config(&config)
}

fn run_loop(config_path: &Path, max_cycles: Option<u64>) -> ExitCode {
    let mut session = match open_session(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    info!(
        symbols = session.engine.config().symbols.len(),
        timeframe = %session.engine.config().timeframe,
        interval_secs = session.poll_interval.as_secs(),
        "Starting signal loop"
    );

    let mut cycle = 1;
    while max_cycles.is_none_or(|max| cycle <= max) {
        if cycle > 1 {
            thread::sleep(session.poll_interval);
        }
        if let Err(e) = session.run_cycle(cycle) {
            error!(cycle, error = %e, "Cycle aborted");
        }
        cycle += 1;
    }

    ExitCode::SUCCESS
}

fn run_once(config_path: &Path) -> ExitCode {
    let mut session = match open_session(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match session.run_cycle(1) {
        Ok(report) => {
            print!("{}", format_report(&report));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    match open_session(config_path) {
        Ok(session) => {
            let strategy = session.engine.config();
            eprintln!("  Timeframe: {}", strategy.timeframe);
            eprintln!("  Symbols:   {}", strategy.symbols.join(", "));
            eprintln!(
                "  EMA {} / swing window {} / retrace {}",
                strategy.ema_period, strategy.swing_window, strategy.fib_retrace
            );
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// One line per instrument, in evaluation order.
pub fn format_report(report: &CycleReport) -> String {
    let mut out = format!("Cycle {} (balance {:.2})\n", report.cycle, report.balance);
    for outcome in &report.outcomes {
        let line = match &outcome.decision {
            Decision::Skipped(SkipReason::InsufficientBars { bars, minimum }) => {
                format!("skipped: {} bars, need {}", bars, minimum)
            }
            Decision::Skipped(SkipReason::DataUnavailable(reason)) => {
                format!("skipped: {}", reason)
            }
            Decision::Skipped(SkipReason::TickUnavailable(reason)) => {
                format!("skipped: {}", reason)
            }
            Decision::NoSignal { trend, level } => {
                format!("no signal (trend {}, level {:.5})", trend, level)
            }
            Decision::Blocked { side, since_cycle } => {
                format!("blocked {} (entered cycle {})", side, since_cycle)
            }
            Decision::Submitted { intent, basis } => {
                if matches!(basis, SizingBasis::Fallback(_)) {
                    format!("{} [fallback volume]", intent)
                } else {
                    intent.to_string()
                }
            }
        };
        out.push_str(&format!("  {:<10} {}\n", outcome.instrument, line));
    }
    out
}
