#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pullbacktrader::domain::account::AccountSnapshot;
use pullbacktrader::domain::bar::{PriceBar, PriceSeries};
use pullbacktrader::domain::error::TraderError;
use pullbacktrader::domain::order::{OrderIntent, Tick};
pub use pullbacktrader::domain::strategy::{StrategyConfig, Timeframe};
use pullbacktrader::domain::symbol::SymbolSpec;
use pullbacktrader::ports::account_port::AccountPort;
use pullbacktrader::ports::data_port::MarketDataFeed;
use pullbacktrader::ports::execution_port::BrokerExecutionPort;
use pullbacktrader::ports::symbol_port::SymbolInfoPort;
use pullbacktrader::ports::tick_port::TickPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataFeed {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataFeed {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(instrument.to_string(), bars);
        self
    }

    pub fn with_error(mut self, instrument: &str, reason: &str) -> Self {
        self.errors.insert(instrument.to_string(), reason.to_string());
        self
    }
}

impl MarketDataFeed for MockDataFeed {
    fn get_recent_bars(
        &self,
        instrument: &str,
        _timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, TraderError> {
        if let Some(reason) = self.errors.get(instrument) {
            return Err(TraderError::Data {
                instrument: instrument.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(instrument).cloned().unwrap_or_default();
        let start = bars.len().saturating_sub(count);
        PriceSeries::new(instrument, bars[start..].to_vec())
    }
}

pub struct MockAccount {
    pub snapshot: Option<AccountSnapshot>,
}

impl MockAccount {
    pub fn with_balance(balance: f64) -> Self {
        Self {
            snapshot: Some(AccountSnapshot {
                balance,
                currency: "USD".to_string(),
            }),
        }
    }

    pub fn unavailable() -> Self {
        Self { snapshot: None }
    }
}

impl AccountPort for MockAccount {
    fn get_account_snapshot(&self) -> Result<AccountSnapshot, TraderError> {
        self.snapshot
            .clone()
            .ok_or_else(|| TraderError::AccountUnavailable {
                reason: "terminal disconnected".to_string(),
            })
    }
}

#[derive(Default)]
pub struct MockSymbols {
    pub specs: HashMap<String, SymbolSpec>,
}

impl MockSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, instrument: &str, spec: SymbolSpec) -> Self {
        self.specs.insert(instrument.to_string(), spec);
        self
    }
}

impl SymbolInfoPort for MockSymbols {
    fn get_symbol_spec(&self, instrument: &str) -> Option<SymbolSpec> {
        self.specs.get(instrument).copied()
    }
}

#[derive(Default)]
pub struct MockTicks {
    pub ticks: HashMap<String, Tick>,
}

impl MockTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick(mut self, instrument: &str, bid: f64, ask: f64) -> Self {
        self.ticks.insert(instrument.to_string(), Tick { bid, ask });
        self
    }
}

impl TickPort for MockTicks {
    fn get_tick(&self, instrument: &str) -> Result<Tick, TraderError> {
        self.ticks
            .get(instrument)
            .copied()
            .ok_or_else(|| TraderError::TickUnavailable {
                instrument: instrument.to_string(),
            })
    }
}

#[derive(Default)]
pub struct RecordingBroker {
    pub submitted: RefCell<Vec<OrderIntent>>,
}

impl RecordingBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.submitted.borrow().len()
    }

    pub fn instruments(&self) -> Vec<String> {
        self.submitted
            .borrow()
            .iter()
            .map(|i| i.instrument.clone())
            .collect()
    }
}

impl BrokerExecutionPort for RecordingBroker {
    fn submit(&self, intent: &OrderIntent) {
        self.submitted.borrow_mut().push(intent.clone());
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// `count` hourly bars whose closes move by `step` per bar.
///
/// Each bar opens half a step behind its close (bullish for a positive step,
/// bearish for a negative one) and its wicks extend half a step beyond the body.
pub fn trending_bars(start_close: f64, step: f64, count: usize) -> Vec<PriceBar> {
    (0..count)
        .map(|i| {
            let close = start_close + step * i as f64;
            let open = close - step / 2.0;
            PriceBar {
                time: start_time() + Duration::hours(i as i64),
                open,
                high: open.max(close) + step.abs() / 2.0,
                low: open.min(close) - step.abs() / 2.0,
                close,
            }
        })
        .collect()
}

pub fn make_series(bars: Vec<PriceBar>) -> PriceSeries {
    PriceSeries::new("TEST", bars).unwrap()
}

pub fn fx_spec() -> SymbolSpec {
    SymbolSpec {
        point: 0.0001,
        contract_size: 100_000.0,
        volume_step: 0.01,
        min_volume: 0.01,
    }
}

/// EMA 3, swing window 5: eight bars are enough to evaluate.
pub fn sample_config(symbols: &[&str]) -> StrategyConfig {
    StrategyConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        timeframe: Timeframe::H1,
        bar_count: 100,
        ema_period: 3,
        fib_retrace: 0.5,
        swing_window: 5,
        stop_buffer_points: 10.0,
        risk_per_trade: 0.01,
    }
}

/// Ten rising bars. Swing low 1.1040, last high 1.1095, 50% level 1.10675.
pub fn uptrend_bars() -> Vec<PriceBar> {
    trending_bars(1.1000, 0.0010, 10)
}

/// Ten falling bars. Swing high 1.2960, last low 1.2905, 50% level 1.29325.
pub fn downtrend_bars() -> Vec<PriceBar> {
    trending_bars(1.3000, -0.0010, 10)
}
