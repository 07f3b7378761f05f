//! Per-cycle signal evaluation.
//!
//! One cycle samples the account once, then walks the configured symbols in
//! order. Each symbol goes through trend -> swing -> retracement -> entry check
//! and, when the check passes and the registry allows it, is sized and handed to
//! the broker. Instruments never influence each other within a cycle.

use crate::domain::account::AccountSnapshot;
use crate::domain::bar::{PriceBar, PriceSeries};
use crate::domain::error::TraderError;
use crate::domain::order::{OrderIntent, Side, Tick};
use crate::domain::registry::PositionRegistry;
use crate::domain::retracement::{entry_condition, retracement_level, stop_distance, stop_price};
use crate::domain::sizing::{SizingBasis, size_position};
use crate::domain::strategy::StrategyConfig;
use crate::domain::swing::{SwingPoint, find_swing};
use crate::domain::symbol::DEFAULT_POINT;
use crate::domain::trend::{TrendFilter, TrendState};
use crate::ports::account_port::AccountPort;
use crate::ports::data_port::MarketDataFeed;
use crate::ports::execution_port::BrokerExecutionPort;
use crate::ports::symbol_port::SymbolInfoPort;
use crate::ports::tick_port::TickPort;
use tracing::{debug, info, warn};

/// The collaborators one cycle talks to.
pub struct MarketPorts<'a> {
    pub data: &'a dyn MarketDataFeed,
    pub account: &'a dyn AccountPort,
    pub symbols: &'a dyn SymbolInfoPort,
    pub ticks: &'a dyn TickPort,
    pub broker: &'a dyn BrokerExecutionPort,
}

/// State shared read-only by every instrument evaluated in one cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleContext<'a> {
    pub cycle: u64,
    pub account: &'a AccountSnapshot,
}

/// Trend, swing and retracement level derived from bars alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setup {
    pub trend: TrendState,
    pub swing: SwingPoint,
    pub level: f64,
    pub last_bar: PriceBar,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InsufficientBars { bars: usize, minimum: usize },
    DataUnavailable(String),
    TickUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Skipped(SkipReason),
    NoSignal {
        trend: TrendState,
        level: f64,
    },
    Blocked {
        side: Side,
        since_cycle: u64,
    },
    Submitted {
        intent: OrderIntent,
        basis: SizingBasis,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentOutcome {
    pub instrument: String,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub balance: f64,
    pub outcomes: Vec<InstrumentOutcome>,
}

impl CycleReport {
    pub fn submitted(&self) -> impl Iterator<Item = &OrderIntent> {
        self.outcomes.iter().filter_map(|o| match &o.decision {
            Decision::Submitted { intent, .. } => Some(intent),
            _ => None,
        })
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.decision, Decision::Skipped(_)))
            .count()
    }

    pub fn outcome(&self, instrument: &str) -> Option<&Decision> {
        self.outcomes
            .iter()
            .find(|o| o.instrument == instrument)
            .map(|o| &o.decision)
    }
}

pub struct SignalEngine {
    config: StrategyConfig,
    trend_filter: TrendFilter,
}

impl SignalEngine {
    pub fn new(config: StrategyConfig) -> Self {
        let trend_filter = TrendFilter::new(config.ema_period);
        Self {
            config,
            trend_filter,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Evaluate every configured symbol once.
    ///
    /// Fails only when the account snapshot is unavailable; in that case no
    /// instrument is evaluated and nothing is submitted.
    pub fn run_cycle(
        &self,
        ports: &MarketPorts<'_>,
        registry: &mut PositionRegistry,
        cycle: u64,
    ) -> Result<CycleReport, TraderError> {
        let account = ports.account.get_account_snapshot()?;
        let ctx = CycleContext {
            cycle,
            account: &account,
        };

        info!(
            cycle,
            balance = account.balance,
            currency = %account.currency,
            symbols = self.config.symbols.len(),
            "Starting evaluation cycle"
        );

        let mut outcomes = Vec::with_capacity(self.config.symbols.len());
        for instrument in &self.config.symbols {
            let decision = self.evaluate(instrument, ports, &ctx, registry);
            outcomes.push(InstrumentOutcome {
                instrument: instrument.clone(),
                decision,
            });
        }

        let report = CycleReport {
            cycle,
            balance: account.balance,
            outcomes,
        };

        info!(
            cycle,
            submitted = report.submitted().count(),
            skipped = report.skipped_count(),
            tracked = registry.len(),
            "Cycle complete"
        );

        Ok(report)
    }

    pub fn evaluate(
        &self,
        instrument: &str,
        ports: &MarketPorts<'_>,
        ctx: &CycleContext<'_>,
        registry: &mut PositionRegistry,
    ) -> Decision {
        let series = match ports.data.get_recent_bars(
            instrument,
            self.config.timeframe,
            self.config.bar_count,
        ) {
            Ok(series) => series,
            Err(e) => {
                warn!(instrument, error = %e, "Skipping instrument: no market data");
                return Decision::Skipped(SkipReason::DataUnavailable(e.to_string()));
            }
        };

        let Some(setup) = self.detect_setup(&series) else {
            debug!(
                instrument,
                bars = series.len(),
                minimum = self.config.min_bars(),
                "Skipping instrument: insufficient history"
            );
            return Decision::Skipped(SkipReason::InsufficientBars {
                bars: series.len(),
                minimum: self.config.min_bars(),
            });
        };

        let tick = match ports.ticks.get_tick(instrument) {
            Ok(tick) => tick,
            Err(e) => {
                warn!(instrument, error = %e, "Skipping instrument: no tick");
                return Decision::Skipped(SkipReason::TickUnavailable(e.to_string()));
            }
        };

        debug!(
            instrument,
            trend = %setup.trend,
            swing = setup.swing.price,
            level = setup.level,
            bid = tick.bid,
            ask = tick.ask,
            "Setup evaluated"
        );

        if !entry_condition(setup.trend, &tick, setup.level, &setup.last_bar) {
            return Decision::NoSignal {
                trend: setup.trend,
                level: setup.level,
            };
        }

        let side = Side::for_trend(setup.trend);
        if let Some(entry) = registry.blocking_entry(instrument, ctx.cycle) {
            warn!(
                instrument,
                side = %side,
                since_cycle = entry.cycle,
                "Entry blocked: instrument already entered"
            );
            return Decision::Blocked {
                side,
                since_cycle: entry.cycle,
            };
        }

        let (intent, basis) = self.build_intent(instrument, &setup, &tick, ports, ctx);

        info!(
            instrument,
            side = %intent.side,
            volume = intent.volume,
            entry = intent.entry_price,
            stop = intent.stop_price,
            "Submitting order intent"
        );
        ports.broker.submit(&intent);
        registry.record(instrument, side, ctx.cycle);

        Decision::Submitted { intent, basis }
    }

    /// `None` when the series is shorter than `ema_period + swing_window`.
    pub fn detect_setup(&self, series: &PriceSeries) -> Option<Setup> {
        if series.len() < self.config.min_bars() {
            return None;
        }

        let trend = self.trend_filter.classify(series)?;
        let swing = find_swing(series, trend, self.config.swing_window)?;
        let last_bar = *series.last()?;

        let (low, high) = match trend {
            TrendState::Up => (swing.price, last_bar.high),
            TrendState::Down => (last_bar.low, swing.price),
        };
        let level = retracement_level(low, high, self.config.fib_retrace, trend);

        Some(Setup {
            trend,
            swing,
            level,
            last_bar,
        })
    }

    fn build_intent(
        &self,
        instrument: &str,
        setup: &Setup,
        tick: &Tick,
        ports: &MarketPorts<'_>,
        ctx: &CycleContext<'_>,
    ) -> (OrderIntent, SizingBasis) {
        let spec = ports.symbols.get_symbol_spec(instrument);
        let point = spec.map_or(DEFAULT_POINT, |s| s.effective_point());
        let side = Side::for_trend(setup.trend);

        let stop = stop_price(
            setup.trend,
            setup.swing.price,
            point,
            self.config.stop_buffer_points,
        );
        let distance = stop_distance(side, tick, stop);
        let sizing = size_position(
            distance,
            ctx.account.balance,
            self.config.risk_per_trade,
            spec.as_ref(),
        );

        if let SizingBasis::Fallback(reason) = sizing.basis {
            warn!(
                instrument,
                reason = %reason,
                volume = sizing.volume,
                "Using fallback volume"
            );
        }

        let intent = OrderIntent {
            instrument: instrument.to_string(),
            side,
            volume: sizing.volume,
            entry_price: tick.entry_price(side),
            stop_price: stop,
        };
        (intent, sizing.basis)
    }
}
