//! Market data port trait.

use crate::domain::bar::PriceSeries;
use crate::domain::error::TraderError;
use crate::domain::strategy::Timeframe;

pub trait MarketDataFeed {
    /// Up to `count` of the most recent bars, oldest first.
    fn get_recent_bars(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, TraderError>;
}
