//! Strategy parameters, built once from configuration and passed to the engine.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SWING_WINDOW: usize = 20;
pub const DEFAULT_STOP_BUFFER_POINTS: f64 = 10.0;
pub const DEFAULT_BAR_COUNT: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe '{0}' (expected one of M1, M5, M15, M30, H1, H4, D1)")]
pub struct UnknownTimeframe(pub String);

impl FromStr for Timeframe {
    type Err = UnknownTimeframe;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == wanted)
            .ok_or_else(|| UnknownTimeframe(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// Evaluated in this order every cycle.
    pub symbols: Vec<String>,
    pub timeframe: Timeframe,
    pub bar_count: usize,
    pub ema_period: usize,
    pub fib_retrace: f64,
    pub swing_window: usize,
    pub stop_buffer_points: f64,
    pub risk_per_trade: f64,
}

impl StrategyConfig {
    /// Bars required before an instrument is evaluated at all.
    pub fn min_bars(&self) -> usize {
        self.ema_period + self.swing_window
    }
}
