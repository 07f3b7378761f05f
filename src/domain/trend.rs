//! Trend classification from the slope of a smoothed close series.

use crate::domain::bar::PriceSeries;
use crate::domain::indicator::ema::calculate_ema;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendState {
    Up,
    Down,
}

impl fmt::Display for TrendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendState::Up => write!(f, "up"),
            TrendState::Down => write!(f, "down"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TrendFilter {
    period: usize,
}

impl TrendFilter {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn smooth(&self, series: &PriceSeries) -> Vec<f64> {
        calculate_ema(&series.closes(), self.period)
    }

    /// `Up` only when the latest EMA is strictly above the previous one; a flat
    /// EMA classifies as `Down`. Returns `None` with fewer than two points.
    pub fn classify(&self, series: &PriceSeries) -> Option<TrendState> {
        classify_smoothed(&self.smooth(series))
    }
}

pub fn classify_smoothed(smoothed: &[f64]) -> Option<TrendState> {
    match smoothed {
        [.., previous, latest] if latest > previous => Some(TrendState::Up),
        [.., _, _] => Some(TrendState::Down),
        _ => None,
    }
}
