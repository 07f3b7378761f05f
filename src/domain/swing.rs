//! Swing point location within a trailing window.

use crate::domain::bar::PriceSeries;
use crate::domain::trend::TrendState;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub price: f64,
    /// Offset from the start of the scanned window.
    pub position: usize,
    pub time: NaiveDateTime,
}

/// Lowest low (`Up`) or highest high (`Down`) of the last `window` bars.
///
/// Ties resolve to the earliest bar. A window longer than the series scans the
/// whole series; an empty series has no swing.
pub fn find_swing(series: &PriceSeries, direction: TrendState, window: usize) -> Option<SwingPoint> {
    let bars = series.tail(window);
    let mut best: Option<SwingPoint> = None;

    for (position, bar) in bars.iter().enumerate() {
        let price = match direction {
            TrendState::Up => bar.low,
            TrendState::Down => bar.high,
        };
        let improves = match (best, direction) {
            (None, _) => true,
            (Some(b), TrendState::Up) => price < b.price,
            (Some(b), TrendState::Down) => price > b.price,
        };
        if improves {
            best = Some(SwingPoint {
                price,
                position,
                time: bar.time,
            });
        }
    }

    best
}
