//! Price bars and validated bar series.

use crate::domain::error::TraderError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    /// close > open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// close < open
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Bars ordered strictly ascending by time, with no duplicate timestamps.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(instrument: &str, bars: Vec<PriceBar>) -> Result<Self, TraderError> {
        if let Some(pair) = bars.windows(2).find(|w| w[1].time <= w[0].time) {
            let reason = if pair[1].time == pair[0].time {
                format!("duplicate timestamp {}", pair[1].time)
            } else {
                format!("{} follows {}", pair[1].time, pair[0].time)
            };
            return Err(TraderError::InvalidSeries {
                instrument: instrument.to_string(),
                reason,
            });
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The most recent `window` bars, or the whole series if it is shorter.
    pub fn tail(&self, window: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(window);
        &self.bars[start..]
    }
}
