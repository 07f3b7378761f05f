//! Retracement levels, the pullback entry condition, and protective stops.

use crate::domain::bar::PriceBar;
use crate::domain::order::{Side, Tick};
use crate::domain::trend::TrendState;

/// Price `fraction` of the way back from the latest extreme toward the swing.
///
/// `Up` measures from `low` (swing low) and `Down` from `high` (swing high), so
/// for `high >= low` and `fraction` in [0,1] the level stays within [low, high].
pub fn retracement_level(low: f64, high: f64, fraction: f64, direction: TrendState) -> f64 {
    let range = high - low;
    match direction {
        TrendState::Up => low + range * fraction,
        TrendState::Down => high - range * fraction,
    }
}

/// Long: bid at or below the level on a bullish bar. Short: ask at or above
/// the level on a bearish bar.
pub fn entry_condition(direction: TrendState, tick: &Tick, level: f64, last_bar: &PriceBar) -> bool {
    match direction {
        TrendState::Up => tick.bid <= level && last_bar.is_bullish(),
        TrendState::Down => tick.ask >= level && last_bar.is_bearish(),
    }
}

/// Swing extreme pushed `buffer_points` points away from the trade.
pub fn stop_price(direction: TrendState, swing_price: f64, point: f64, buffer_points: f64) -> f64 {
    let buffer = point * buffer_points;
    match direction {
        TrendState::Up => swing_price - buffer,
        TrendState::Down => swing_price + buffer,
    }
}

/// Distance from the quote the risk is measured against: bid for longs, ask
/// for shorts.
pub fn stop_distance(side: Side, tick: &Tick, stop: f64) -> f64 {
    match side {
        Side::Buy => (tick.bid - stop).abs(),
        Side::Sell => (stop - tick.ask).abs(),
    }
}
