//! Paper-trading adapters backed by configuration and the CSV bar feed.
//!
//! Nothing here talks to a broker; submitted intents are only recorded.

use crate::domain::account::AccountSnapshot;
use crate::domain::error::TraderError;
use crate::domain::order::{OrderIntent, Tick};
use crate::domain::strategy::Timeframe;
use crate::domain::symbol::{DEFAULT_POINT, SymbolSpec};
use crate::ports::account_port::AccountPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataFeed;
use crate::ports::execution_port::BrokerExecutionPort;
use crate::ports::symbol_port::SymbolInfoPort;
use crate::ports::tick_port::TickPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::{error, info};

pub struct PaperAccount {
    snapshot: AccountSnapshot,
}

impl PaperAccount {
    pub fn new(balance: f64, currency: &str) -> Self {
        Self {
            snapshot: AccountSnapshot {
                balance,
                currency: currency.to_string(),
            },
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let currency = config
            .get_string("paper", "currency")
            .unwrap_or_else(|| "USD".to_string());
        Self::new(config.get_double("paper", "balance", 0.0), &currency)
    }
}

impl AccountPort for PaperAccount {
    fn get_account_snapshot(&self) -> Result<AccountSnapshot, TraderError> {
        Ok(self.snapshot.clone())
    }
}

/// Specifications from `[symbol.<SYMBOL>]` sections. Symbols without a section
/// have no specification.
#[derive(Debug, Clone, Default)]
pub struct ConfigSymbolInfo {
    specs: HashMap<String, SymbolSpec>,
}

impl ConfigSymbolInfo {
    pub fn from_config(config: &dyn ConfigPort, symbols: &[String]) -> Self {
        let mut specs = HashMap::new();
        for symbol in symbols {
            let section = format!("symbol.{}", symbol);
            if !config.has_section(&section) {
                continue;
            }
            specs.insert(
                symbol.clone(),
                SymbolSpec {
                    point: config.get_double(&section, "point", 0.0),
                    contract_size: config.get_double(&section, "contract_size", 0.0),
                    volume_step: config.get_double(&section, "volume_step", 0.0),
                    min_volume: config.get_double(&section, "min_volume", 0.0),
                },
            );
        }
        Self { specs }
    }
}

impl SymbolInfoPort for ConfigSymbolInfo {
    fn get_symbol_spec(&self, instrument: &str) -> Option<SymbolSpec> {
        self.specs.get(instrument).copied()
    }
}

/// bid = last close, ask = bid + spread_points * point.
pub struct LastCloseTicks<'a> {
    feed: &'a dyn MarketDataFeed,
    symbols: &'a dyn SymbolInfoPort,
    timeframe: Timeframe,
    spread_points: f64,
}

impl<'a> LastCloseTicks<'a> {
    pub fn new(
        feed: &'a dyn MarketDataFeed,
        symbols: &'a dyn SymbolInfoPort,
        timeframe: Timeframe,
        spread_points: f64,
    ) -> Self {
        Self {
            feed,
            symbols,
            timeframe,
            spread_points,
        }
    }
}

impl TickPort for LastCloseTicks<'_> {
    fn get_tick(&self, instrument: &str) -> Result<Tick, TraderError> {
        let unavailable = || TraderError::TickUnavailable {
            instrument: instrument.to_string(),
        };
        let series = self
            .feed
            .get_recent_bars(instrument, self.timeframe, 1)
            .map_err(|_| unavailable())?;
        let last = series.last().ok_or_else(unavailable)?;
        let point = self
            .symbols
            .get_symbol_spec(instrument)
            .map_or(DEFAULT_POINT, |s| s.effective_point());

        Ok(Tick {
            bid: last.close,
            ask: last.close + self.spread_points * point,
        })
    }
}

/// Records intents in memory and optionally appends them to a CSV journal.
#[derive(Debug, Default)]
pub struct PaperBroker {
    submitted: RefCell<Vec<OrderIntent>>,
    journal: Option<PathBuf>,
}

impl PaperBroker {
    pub fn new(journal: Option<PathBuf>) -> Self {
        Self {
            submitted: RefCell::new(Vec::new()),
            journal,
        }
    }

    pub fn submitted(&self) -> Vec<OrderIntent> {
        self.submitted.borrow().clone()
    }

    fn append_journal(&self, path: &PathBuf, intent: &OrderIntent) -> Result<(), TraderError> {
        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let io_err = |e: csv::Error| TraderError::Io(std::io::Error::other(e));
        if is_new {
            writer
                .write_record(["instrument", "side", "volume", "entry_price", "stop_price"])
                .map_err(io_err)?;
        }
        writer
            .write_record([
                intent.instrument.clone(),
                intent.side.to_string(),
                intent.volume.to_string(),
                intent.entry_price.to_string(),
                intent.stop_price.to_string(),
            ])
            .map_err(io_err)?;
        writer.flush()?;
        Ok(())
    }
}

impl BrokerExecutionPort for PaperBroker {
    fn submit(&self, intent: &OrderIntent) {
        info!(
            instrument = %intent.instrument,
            side = %intent.side,
            volume = intent.volume,
            price = intent.entry_price,
            stop = intent.stop_price,
            "[PAPER] Order accepted"
        );
        self.submitted.borrow_mut().push(intent.clone());

        if let Some(path) = &self.journal {
            if let Err(e) = self.append_journal(path, intent) {
                error!(path = %path.display(), error = %e, "Failed to write order journal");
            }
        }
    }
}
