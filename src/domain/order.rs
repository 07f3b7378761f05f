//! Order intents handed to the execution boundary.

use crate::domain::trend::TrendState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn for_trend(trend: TrendState) -> Self {
        match trend {
            TrendState::Up => Side::Buy,
            TrendState::Down => Side::Sell,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub bid: f64,
    pub ask: f64,
}

impl Tick {
    /// Price a market order on `side` fills at: ask for buys, bid for sells.
    pub fn entry_price(&self, side: Side) -> f64 {
        match side {
            Side::Buy => self.ask,
            Side::Sell => self.bid,
        }
    }
}

/// Immutable once built. Nothing tracks an intent after submission.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub instrument: String,
    pub side: Side,
    pub volume: f64,
    pub entry_price: f64,
    pub stop_price: f64,
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {} (stop {})",
            self.side, self.instrument, self.volume, self.entry_price, self.stop_price
        )
    }
}
