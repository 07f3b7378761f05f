//! CSV file market data adapter.
//!
//! One file per instrument and timeframe, `<SYMBOL>_<TF>.csv`, with header
//! `time,open,high,low,close[,volume]`. Times are `%Y-%m-%d %H:%M:%S` or a
//! bare `%Y-%m-%d` (midnight).

use crate::domain::bar::{PriceBar, PriceSeries};
use crate::domain::error::TraderError;
use crate::domain::strategy::Timeframe;
use crate::ports::data_port::MarketDataFeed;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", instrument, timeframe))
    }
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str, instrument: &str) -> Result<f64, TraderError> {
    record
        .get(index)
        .ok_or_else(|| TraderError::Data {
            instrument: instrument.to_string(),
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| TraderError::Data {
            instrument: instrument.to_string(),
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl MarketDataFeed for CsvMarketData {
    fn get_recent_bars(
        &self,
        instrument: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<PriceSeries, TraderError> {
        let path = self.csv_path(instrument, timeframe);
        let content = fs::read_to_string(&path).map_err(|e| TraderError::Data {
            instrument: instrument.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| TraderError::Data {
                instrument: instrument.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let time_str = record.get(0).ok_or_else(|| TraderError::Data {
                instrument: instrument.to_string(),
                reason: "missing time column".into(),
            })?;
            let time = parse_time(time_str.trim()).ok_or_else(|| TraderError::Data {
                instrument: instrument.to_string(),
                reason: format!("invalid time value: {}", time_str),
            })?;

            bars.push(PriceBar {
                time,
                open: parse_price(&record, 1, "open", instrument)?,
                high: parse_price(&record, 2, "high", instrument)?,
                low: parse_price(&record, 3, "low", instrument)?,
                close: parse_price(&record, 4, "close", instrument)?,
            });
        }

        bars.sort_by_key(|b| b.time);
        let start = bars.len().saturating_sub(count);
        bars.drain(..start);
        PriceSeries::new(instrument, bars)
    }
}
