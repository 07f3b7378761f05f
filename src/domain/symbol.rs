//! Per-instrument trading specification.

pub const DEFAULT_POINT: f64 = 0.0001;
pub const DEFAULT_CONTRACT_SIZE: f64 = 100_000.0;
pub const DEFAULT_VOLUME_STEP: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolSpec {
    pub point: f64,
    pub contract_size: f64,
    pub volume_step: f64,
    pub min_volume: f64,
}

impl SymbolSpec {
    /// Point size, or [`DEFAULT_POINT`] when the broker reports none.
    pub fn effective_point(&self) -> f64 {
        positive_or(self.point, DEFAULT_POINT)
    }

    pub fn effective_contract_size(&self) -> f64 {
        positive_or(self.contract_size, DEFAULT_CONTRACT_SIZE)
    }

    pub fn effective_volume_step(&self) -> f64 {
        positive_or(self.volume_step, DEFAULT_VOLUME_STEP)
    }
}

fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 { value } else { default }
}
